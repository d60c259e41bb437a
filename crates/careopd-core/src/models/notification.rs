//! Session-scoped notification feed entries.

use serde::{Deserialize, Serialize};

/// Tone of a notification. Cancellations use `Error` for visibility even
/// though the operation succeeded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// One entry in the append-only, session-durable notification feed.
/// No persistence guarantee; the feed dies with the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    /// Timestamp-derived id, unique enough within a session.
    pub id: i64,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Display timestamp, `HH:MM` local time.
    pub timestamp: String,
    pub read: bool,
}

impl Notification {
    /// Build a feed entry stamped with the current local time.
    pub fn now(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            id: chrono::Utc::now().timestamp_millis(),
            message: message.into(),
            kind,
            timestamp: crate::timefmt::local_time_of_day(),
            read: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_stamps_fields() {
        let n = Notification::now("Appointment Booked", NotificationKind::Success);
        assert_eq!(n.message, "Appointment Booked");
        assert!(!n.read);
        assert!(crate::timefmt::is_canonical_time(&n.timestamp));
    }

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&NotificationKind::Success).unwrap(),
            r#""success""#
        );
    }
}
