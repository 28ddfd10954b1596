use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use strum::{AsRefStr, EnumString};

/// Academic term within a year
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}

/// Identifies a semester, rendered as e.g. `Fall2024`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SemesterId {
    pub season: Season,
    pub year: i32,
}

impl SemesterId {
    pub const fn new(season: Season, year: i32) -> Self {
        Self { season, year }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid semester identifier: {0:?}")]
pub struct ParseSemesterError(pub String);

impl FromStr for SemesterId {
    type Err = ParseSemesterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| ParseSemesterError(s.to_string()))?;
        let (season, year) = s.split_at(split);

        let season =
            Season::from_str(season.trim()).map_err(|_| ParseSemesterError(s.to_string()))?;
        let year = year.parse().map_err(|_| ParseSemesterError(s.to_string()))?;

        Ok(Self { season, year })
    }
}

impl Display for SemesterId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}", self.season.as_str(), self.year)
    }
}

impl Serialize for SemesterId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SemesterId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A semester and the inclusive range of dates it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    pub id: SemesterId,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
}

impl Semester {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first_day <= date && date <= self.last_day
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("semester {0} ends before it starts")]
    InvertedRange(SemesterId),

    #[error("semesters {0} and {1} overlap")]
    Overlap(SemesterId, SemesterId),

    #[error("semester {0} is configured more than once")]
    Duplicate(SemesterId),
}

/// The configured set of non-overlapping semesters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemesterCalendar {
    semesters: Vec<Semester>,
}

impl SemesterCalendar {
    pub fn new(mut semesters: Vec<Semester>) -> Result<Self, CalendarError> {
        if let Some(bad) = semesters.iter().find(|s| s.last_day < s.first_day) {
            return Err(CalendarError::InvertedRange(bad.id));
        }

        semesters.sort_by_key(|s| s.first_day);

        for pair in semesters.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if b.first_day <= a.last_day {
                return Err(CalendarError::Overlap(a.id, b.id));
            }
        }

        let mut ids: Vec<SemesterId> = semesters.iter().map(|s| s.id).collect();
        ids.sort();
        if let Some(dup) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(CalendarError::Duplicate(dup[0]));
        }

        Ok(Self { semesters })
    }

    /// Finds the semester whose date range includes `date`
    pub fn semester_containing(&self, date: NaiveDate) -> Option<&Semester> {
        // Sorted and disjoint, so at most one candidate precedes `date`
        let idx = self.semesters.partition_point(|s| s.first_day <= date);
        idx.checked_sub(1)
            .map(|i| &self.semesters[i])
            .filter(|s| s.contains(date))
    }

    pub fn semesters(&self) -> &[Semester] {
        &self.semesters
    }

    pub fn is_empty(&self) -> bool {
        self.semesters.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn semester(season: Season, year: i32, first: NaiveDate, last: NaiveDate) -> Semester {
        Semester {
            id: SemesterId::new(season, year),
            first_day: first,
            last_day: last,
        }
    }

    fn calendar() -> SemesterCalendar {
        SemesterCalendar::new(vec![
            semester(Season::Winter, 2025, date(2025, 1, 6), date(2025, 4, 25)),
            semester(Season::Fall, 2024, date(2024, 9, 3), date(2024, 12, 20)),
        ])
        .unwrap()
    }

    #[test]
    fn test_semester_id_round_trip() {
        let id = SemesterId::from_str("Fall2024").unwrap();
        assert_eq!(id, SemesterId::new(Season::Fall, 2024));
        assert_eq!(id.to_string(), "Fall2024");
        assert_eq!(
            SemesterId::from_str("winter 2025").unwrap(),
            SemesterId::new(Season::Winter, 2025)
        );
        assert!(SemesterId::from_str("Autumn2024").is_err());
        assert!(SemesterId::from_str("Fall").is_err());
    }

    #[test]
    fn test_semester_id_serde() {
        let id = SemesterId::new(Season::Summer, 2026);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"Summer2026\"");
        let back: SemesterId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_semester_containing() {
        let calendar = calendar();

        let fall = calendar.semester_containing(date(2024, 10, 14)).unwrap();
        assert_eq!(fall.id.to_string(), "Fall2024");

        // Range bounds are inclusive
        assert!(calendar.semester_containing(date(2024, 9, 3)).is_some());
        assert!(calendar.semester_containing(date(2024, 12, 20)).is_some());
        assert!(calendar.semester_containing(date(2025, 1, 6)).is_some());

        // Between semesters and outside the calendar
        assert!(calendar.semester_containing(date(2024, 12, 25)).is_none());
        assert!(calendar.semester_containing(date(2024, 8, 1)).is_none());
        assert!(calendar.semester_containing(date(2025, 6, 1)).is_none());
    }

    #[test]
    fn test_calendar_rejects_bad_ranges() {
        let inverted = SemesterCalendar::new(vec![semester(
            Season::Fall,
            2024,
            date(2024, 12, 1),
            date(2024, 9, 1),
        )]);
        assert!(matches!(inverted, Err(CalendarError::InvertedRange(_))));

        let overlapping = SemesterCalendar::new(vec![
            semester(Season::Fall, 2024, date(2024, 9, 1), date(2024, 12, 31)),
            semester(Season::Winter, 2025, date(2024, 12, 31), date(2025, 4, 1)),
        ]);
        assert!(matches!(overlapping, Err(CalendarError::Overlap(_, _))));

        let duplicate = SemesterCalendar::new(vec![
            semester(Season::Fall, 2024, date(2024, 9, 1), date(2024, 9, 30)),
            semester(Season::Fall, 2024, date(2024, 10, 1), date(2024, 12, 31)),
        ]);
        assert!(matches!(duplicate, Err(CalendarError::Duplicate(_))));
    }

    #[test]
    fn test_empty_calendar() {
        let calendar = SemesterCalendar::new(vec![]).unwrap();
        assert!(calendar.is_empty());
        assert!(calendar.semester_containing(date(2024, 10, 1)).is_none());
    }
}
