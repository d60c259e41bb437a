//! The canonical slot grid.
//!
//! Every bookable time of day comes from this one table. Doctors' shifts and
//! existing bookings only ever *filter* the grid; nothing extends it.

/// Minutes between consecutive slots.
pub const SLOT_INTERVAL_MINUTES: u32 = 30;

/// The full-day slot grid: "00:00" through "23:30" at the slot interval,
/// ordered, zero-padded. Pure function of nothing; two calls always return
/// identical sequences.
pub fn time_grid() -> Vec<String> {
    let mut slots = Vec::with_capacity((24 * 60 / SLOT_INTERVAL_MINUTES) as usize);
    let mut minutes = 0u32;
    while minutes < 24 * 60 {
        slots.push(format!("{:02}:{:02}", minutes / 60, minutes % 60));
        minutes += SLOT_INTERVAL_MINUTES;
    }
    slots
}
