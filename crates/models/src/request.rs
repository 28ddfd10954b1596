use crate::{
    days::Day,
    semester::{SemesterCalendar, SemesterId},
    time_range::{TimeRange, parse_time_of_day},
};
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Date format used by the request form
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Names of the search form fields, in form order
pub const REQUEST_FIELDS: [&str; 5] = [
    "select_time",
    "select_duration",
    "select_date",
    "select_campus",
    "select_num_people",
];

/// The search form exactly as submitted; any field may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRequestFields {
    pub select_time: Option<String>,
    pub select_duration: Option<String>,
    pub select_date: Option<String>,
    pub select_campus: Option<String>,
    pub select_num_people: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingField(Vec<&'static str>),

    #[error("invalid value {value:?} for {field}")]
    InvalidField { field: &'static str, value: String },

    #[error("a booking starting at {start} lasting {minutes} minutes is not a valid time range")]
    InvalidTimeRange { start: NaiveTime, minutes: i64 },

    #[error("{0} does not fall within any semester")]
    NoSemesterForDate(NaiveDate),
}

/// A validated search with its derived fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub date: NaiveDate,
    pub time: TimeRange,
    pub duration_minutes: i64,
    pub campus: String,
    pub min_capacity: u32,
    pub day: Day,
    pub semester: SemesterId,
}

impl BookingRequest {
    pub fn start_time(&self) -> NaiveTime {
        self.time.begin
    }

    pub fn end_time(&self) -> NaiveTime {
        self.time.end
    }
}

/// The five form fields, all known to be present
struct PresentFields<'a> {
    time: &'a str,
    duration: &'a str,
    date: &'a str,
    campus: &'a str,
    num_people: &'a str,
}

impl RawRequestFields {
    /// Checks every field for presence before anything is parsed, so the
    /// caller learns about all missing fields at once
    fn require_all(&self) -> Result<PresentFields<'_>, ValidationError> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty())
        }

        let values = [
            present(&self.select_time),
            present(&self.select_duration),
            present(&self.select_date),
            present(&self.select_campus),
            present(&self.select_num_people),
        ];

        let missing: Vec<&'static str> = REQUEST_FIELDS
            .iter()
            .zip(&values)
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();

        match values {
            [
                Some(time),
                Some(duration),
                Some(date),
                Some(campus),
                Some(num_people),
            ] => Ok(PresentFields {
                time,
                duration,
                date,
                campus,
                num_people,
            }),
            _ => Err(ValidationError::MissingField(missing)),
        }
    }
}

fn invalid(field: &'static str, value: &str) -> ValidationError {
    ValidationError::InvalidField {
        field,
        value: value.to_string(),
    }
}

/// Turns raw form input into a [`BookingRequest`], deriving the end time,
/// day of week and semester
pub fn normalize(
    raw: &RawRequestFields,
    calendar: &SemesterCalendar,
) -> Result<BookingRequest, ValidationError> {
    let fields = raw.require_all()?;

    let start = parse_time_of_day(fields.time).ok_or_else(|| invalid("select_time", fields.time))?;
    let minutes: i64 = fields
        .duration
        .parse()
        .map_err(|_| invalid("select_duration", fields.duration))?;
    let date = NaiveDate::parse_from_str(fields.date, DATE_FORMAT)
        .map_err(|_| invalid("select_date", fields.date))?;
    let min_capacity: u32 = fields
        .num_people
        .parse()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| invalid("select_num_people", fields.num_people))?;

    let time = TimeRange::starting_at(start, minutes)
        .ok_or(ValidationError::InvalidTimeRange { start, minutes })?;

    let semester = calendar
        .semester_containing(date)
        .ok_or(ValidationError::NoSemesterForDate(date))?;

    Ok(BookingRequest {
        date,
        time,
        duration_minutes: minutes,
        campus: fields.campus.to_string(),
        min_capacity,
        day: Day::from(date.weekday()),
        semester: semester.id,
    })
}
