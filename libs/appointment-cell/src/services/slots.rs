use shared_models::scheduling::{Appointment, ClockTime, TimeWindow};

/// A half-open `[start, end)` interval within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeRange {
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// `None` when the range would run past midnight.
    pub fn starting_at(start: ClockTime, duration_minutes: u32) -> Option<Self> {
        start
            .checked_add_minutes(duration_minutes)
            .map(|end| Self { start, end })
    }

    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }
}

impl From<TimeWindow> for TimeRange {
    fn from(window: TimeWindow) -> Self {
        Self::new(window.start, window.end)
    }
}

impl From<&Appointment> for TimeRange {
    fn from(appointment: &Appointment) -> Self {
        Self::new(appointment.start_time, appointment.end_time)
    }
}

/// The one conflict check shared by availability and booking. Callers pass the
/// appointments of a single date.
pub fn is_taken(range: &TimeRange, appointments: &[Appointment]) -> bool {
    appointments
        .iter()
        .any(|appointment| range.overlaps(&TimeRange::from(appointment)))
}

/// Candidate slots for a working day, ascending by start time.
///
/// Starts at opening time and advances by `interval_minutes`; a candidate must
/// end by closing time, and candidates touching the lunch break are skipped.
pub fn candidate_ranges(
    hours: TimeWindow,
    lunch: TimeWindow,
    interval_minutes: u32,
    duration_minutes: u32,
) -> Vec<TimeRange> {
    let lunch = TimeRange::from(lunch);
    let mut candidates = Vec::new();

    if interval_minutes == 0 {
        return candidates;
    }

    let mut start = hours.start;
    while let Some(range) = TimeRange::starting_at(start, duration_minutes) {
        if range.end > hours.end {
            break;
        }
        if !range.overlaps(&lunch) {
            candidates.push(range);
        }
        match start.checked_add_minutes(interval_minutes) {
            Some(next) => start = next,
            None => break,
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(raw: &str) -> ClockTime {
        raw.parse().unwrap()
    }

    fn range(start: &str, end: &str) -> TimeRange {
        TimeRange::new(t(start), t(end))
    }

    #[test]
    fn test_touching_ranges_do_not_overlap() {
        let a = range("09:00", "09:30");
        let b = range("09:30", "10:00");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_overlap_is_symmetric_and_covers_containment() {
        let outer = range("09:00", "11:00");
        let inner = range("09:30", "10:00");
        let partial = range("10:45", "11:15");

        assert!(outer.overlaps(&inner) && inner.overlaps(&outer));
        assert!(outer.overlaps(&partial) && partial.overlaps(&outer));
        assert!(outer.overlaps(&outer));
        assert!(!inner.overlaps(&partial) && !partial.overlaps(&inner));
    }

    #[test]
    fn test_candidates_skip_lunch_and_fit_closing() {
        let hours = TimeWindow { start: t("08:00"), end: t("18:00") };
        let lunch = TimeWindow { start: t("12:00"), end: t("13:00") };

        let slots = candidate_ranges(hours, lunch, 30, 30);
        assert_eq!(slots.first(), Some(&range("08:00", "08:30")));
        assert_eq!(slots.last(), Some(&range("17:30", "18:00")));
        assert!(slots.iter().all(|slot| !slot.overlaps(&TimeRange::from(lunch))));
        assert!(slots.windows(2).all(|pair| pair[0].start < pair[1].start));
        // 08:00-12:00 gives 8, 13:00-18:00 gives 10
        assert_eq!(slots.len(), 18);
    }

    #[test]
    fn test_longer_types_drop_partially_overlapping_candidates() {
        let hours = TimeWindow { start: t("08:00"), end: t("18:00") };
        let lunch = TimeWindow { start: t("12:00"), end: t("13:00") };

        let slots = candidate_ranges(hours, lunch, 30, 45);
        assert!(slots.contains(&range("11:00", "11:45")));
        assert!(!slots.iter().any(|slot| slot.start == t("11:30")));
        assert_eq!(slots.last(), Some(&range("17:00", "17:45")));
    }

    #[test]
    fn test_range_past_midnight_is_rejected() {
        assert_eq!(TimeRange::starting_at(t("23:30"), 60), None);
        assert_eq!(TimeRange::starting_at(t("23:00"), 60), Some(range("23:00", "24:00")));
    }
}
