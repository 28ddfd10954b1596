use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Accepted time-of-day formats, tried in order
const TIME_FORMATS: [&str; 4] = ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"];

/// Parses a time of day such as `13:30`, `1:30 PM` or `01:30PM`
pub fn parse_time_of_day(input: &str) -> Option<NaiveTime> {
    let input = input.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(input, fmt).ok())
}

/// Half-open time window `[begin, end)` within a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub begin: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    /// Creates a new `TimeRange` if `begin` is before `end`
    pub fn new(begin: NaiveTime, end: NaiveTime) -> Option<Self> {
        (begin < end).then_some(Self { begin, end })
    }

    /// Creates the window starting at `begin` and lasting `minutes`.
    ///
    /// Returns `None` for a non-positive duration or when the window would
    /// reach or cross midnight.
    pub fn starting_at(begin: NaiveTime, minutes: i64) -> Option<Self> {
        if minutes <= 0 {
            return None;
        }

        let begin_minutes = i64::from(begin.num_seconds_from_midnight()) / 60;
        let end_minutes = begin_minutes.checked_add(minutes)?;

        // 24:00 is not representable as a time of day, so the last valid end is 23:59
        if end_minutes >= 24 * 60 {
            return None;
        }

        let end = begin.overflowing_add_signed(chrono::Duration::minutes(minutes)).0;
        Self::new(begin, end)
    }

    /// Parses two time strings and creates a `TimeRange` if valid
    pub fn from_strings(begin: &str, end: &str) -> Option<Self> {
        Self::new(parse_time_of_day(begin)?, parse_time_of_day(end)?)
    }

    /// Standard half-open overlap: each window starts before the other ends
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.begin < other.end && other.begin < self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.begin).num_minutes()
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}-{}", self.begin.format("%H:%M"), self.end.format("%H:%M"))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("13:30"), Some(t(13, 30)));
        assert_eq!(parse_time_of_day(" 08:05 "), Some(t(8, 5)));
        assert_eq!(parse_time_of_day("1:30 PM"), Some(t(13, 30)));
        assert_eq!(parse_time_of_day("09:00AM"), Some(t(9, 0)));
        assert_eq!(parse_time_of_day("25:00"), None);
        assert_eq!(parse_time_of_day("noon"), None);
    }

    #[test]
    fn test_new_requires_positive_length() {
        assert!(TimeRange::new(t(9, 0), t(10, 0)).is_some());
        assert!(TimeRange::new(t(10, 0), t(10, 0)).is_none());
        assert!(TimeRange::new(t(11, 0), t(10, 0)).is_none());
    }

    #[test]
    fn test_starting_at() {
        let range = TimeRange::starting_at(t(13, 0), 90).unwrap();
        assert_eq!(range.end, t(14, 30));
        assert_eq!(range.duration_minutes(), 90);

        assert!(TimeRange::starting_at(t(13, 0), 0).is_none());
        assert!(TimeRange::starting_at(t(13, 0), -30).is_none());

        // Ending at or after midnight is rejected rather than wrapped
        assert!(TimeRange::starting_at(t(23, 0), 60).is_none());
        assert!(TimeRange::starting_at(t(23, 0), 120).is_none());
        assert_eq!(TimeRange::starting_at(t(23, 0), 59).unwrap().end, t(23, 59));
    }

    #[test]
    fn test_overlap_is_half_open() {
        let booking = TimeRange::new(t(13, 0), t(14, 0)).unwrap();

        // Touching boundaries do not overlap
        assert!(!booking.overlaps(&TimeRange::new(t(14, 0), t(15, 0)).unwrap()));
        assert!(!booking.overlaps(&TimeRange::new(t(12, 0), t(13, 0)).unwrap()));

        assert!(booking.overlaps(&TimeRange::new(t(13, 30), t(14, 30)).unwrap()));
        assert!(booking.overlaps(&TimeRange::new(t(12, 30), t(13, 1)).unwrap()));
        assert!(booking.overlaps(&TimeRange::new(t(13, 15), t(13, 45)).unwrap()));
        assert!(booking.overlaps(&TimeRange::new(t(12, 0), t(15, 0)).unwrap()));
    }

    #[test]
    fn test_display() {
        let range = TimeRange::from_strings("9:00 AM", "10:15").unwrap();
        assert_eq!(range.to_string(), "09:00-10:15");
    }
}
