//! Doctor shift windows and slot filtering.

use crate::models::Doctor;

/// Default morning window applied when a doctor has no configured hours.
pub const DEFAULT_MORNING: (&str, &str) = ("09:00", "13:00");
/// Default evening window applied when a doctor has no configured hours.
pub const DEFAULT_EVENING: (&str, &str) = ("17:00", "21:00");

/// A doctor's bookable windows. Each window is half-open `[start, end)` over
/// canonical `HH:MM` strings; comparison is lexicographic, which matches
/// chronological order for zero-padded 24h times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftWindows {
    pub morning_start: String,
    pub morning_end: String,
    pub evening_start: String,
    pub evening_end: String,
}

impl ShiftWindows {
    /// Windows for a doctor, substituting the clinic defaults for any field
    /// that is unset or blank.
    pub fn for_doctor(doctor: &Doctor) -> Self {
        Self {
            morning_start: field_or(&doctor.morning_start, DEFAULT_MORNING.0),
            morning_end: field_or(&doctor.morning_end, DEFAULT_MORNING.1),
            evening_start: field_or(&doctor.evening_start, DEFAULT_EVENING.0),
            evening_end: field_or(&doctor.evening_end, DEFAULT_EVENING.1),
        }
    }

    /// Windows that admit nothing. A misconfigured doctor (start at or after
    /// end) behaves the same way: the filtered grid comes back empty and the
    /// caller renders a "no shifts configured" state instead of an error.
    pub fn none() -> Self {
        Self {
            morning_start: String::new(),
            morning_end: String::new(),
            evening_start: String::new(),
            evening_end: String::new(),
        }
    }

    /// Whether a time of day falls inside the morning or evening window.
    pub fn contains(&self, time: &str) -> bool {
        let morning =
            time >= self.morning_start.as_str() && time < self.morning_end.as_str();
        let evening =
            time >= self.evening_start.as_str() && time < self.evening_end.as_str();
        morning || evening
    }

    /// Narrow the canonical grid to this doctor's bookable slots, in order.
    pub fn filter_slots(&self, grid: &[String]) -> Vec<String> {
        grid.iter()
            .filter(|t| self.contains(t.as_str()))
            .cloned()
            .collect()
    }
}

fn field_or(value: &Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.clone(),
        _ => default.to_string(),
    }
}
