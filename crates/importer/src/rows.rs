//! CSV rows accepted by the importer, validated with the model types.
//!
//! | file      | columns                                                   |
//! |-----------|-----------------------------------------------------------|
//! | semesters | `semester,first_day,last_day`                             |
//! | rooms     | `campus,name,capacity[,building][,description][,id]`      |
//! | bookings  | `campus,room,days,semester,start,end[,label]`             |
//!
//! Dates are `YYYY-MM-DD`, times `HH:MM`, days a pattern such as `MWF`.

use crate::error::ImportError;
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use database::services::import::LabeledBooking;
use models::{
    days::DaySet,
    request::DATE_FORMAT,
    room::{Booking, Room},
    semester::{Semester, SemesterCalendar, SemesterId},
    time_range::TimeRange,
};
use serde::{Deserialize, de::DeserializeOwned};
use std::io::Read;
use uuid::Uuid;

/// Deserializes every record, pairing it with the line it starts on
fn read_records<T, R>(reader: R) -> Result<Vec<(u64, T)>, ImportError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();

    reader
        .records()
        .map(|record| -> Result<(u64, T), ImportError> {
            let record = record?;
            let line = record.position().map_or(0, |position| position.line());
            Ok((line, record.deserialize(Some(&headers))?))
        })
        .collect()
}

fn parse_date(line: u64, value: &str) -> Result<NaiveDate, ImportError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ImportError::invalid(line, format!("invalid date {value:?}")))
}

fn parse_semester(line: u64, value: &str) -> Result<SemesterId, ImportError> {
    value
        .parse()
        .map_err(|e| ImportError::invalid(line, format!("{e}")))
}

fn require(line: u64, field: &str, value: &str) -> Result<(), ImportError> {
    if value.is_empty() {
        return Err(ImportError::invalid(line, format!("{field} is empty")));
    }
    Ok(())
}

#[derive(Deserialize)]
struct SemesterRecord {
    semester: String,
    first_day: String,
    last_day: String,
}

/// Reads semesters, rejecting a file whose ranges overlap
pub fn read_semesters<R: Read>(reader: R) -> Result<Vec<Semester>, ImportError> {
    let semesters = read_records::<SemesterRecord, _>(reader)?
        .into_iter()
        .map(|(line, record)| -> Result<Semester, ImportError> {
            Ok(Semester {
                id: parse_semester(line, &record.semester)?,
                first_day: parse_date(line, &record.first_day)?,
                last_day: parse_date(line, &record.last_day)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    SemesterCalendar::new(semesters.clone())?;
    Ok(semesters)
}

#[derive(Deserialize)]
struct RoomRecord {
    campus: String,
    name: String,
    capacity: u32,
    #[serde(default)]
    building: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    id: Option<Uuid>,
}

/// A room row; rows without an id keep the id of the existing room of the
/// same name, or get a new one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRow {
    pub line: u64,
    pub id: Option<Uuid>,
    pub campus: String,
    pub name: String,
    pub building: String,
    pub capacity: u32,
    pub description: Option<String>,
}

impl RoomRow {
    pub fn into_room(self, id: Uuid) -> Room {
        Room {
            id,
            campus: self.campus,
            name: self.name,
            building: self.building,
            capacity: self.capacity,
            description: self.description,
        }
    }
}

/// Room names start with their building code, e.g. `UA1350`
fn building_of(name: &str) -> String {
    name.chars().take_while(|c| c.is_ascii_alphabetic()).collect()
}

pub fn read_rooms<R: Read>(reader: R) -> Result<Vec<RoomRow>, ImportError> {
    read_records::<RoomRecord, _>(reader)?
        .into_iter()
        .map(|(line, record)| -> Result<RoomRow, ImportError> {
            require(line, "campus", &record.campus)?;
            require(line, "name", &record.name)?;

            let building = record
                .building
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| building_of(&record.name));

            Ok(RoomRow {
                line,
                id: record.id,
                campus: record.campus,
                building,
                name: record.name,
                capacity: record.capacity,
                description: record.description.filter(|d| !d.is_empty()),
            })
        })
        .collect()
}

#[derive(Deserialize)]
struct BookingRecord {
    campus: String,
    room: String,
    days: String,
    semester: String,
    start: String,
    end: String,
    #[serde(default)]
    label: Option<String>,
}

/// A recurring booking on one or more days, before its room is resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRow {
    pub line: u64,
    pub campus: String,
    pub room: String,
    pub days: DaySet,
    pub semester: SemesterId,
    pub time: TimeRange,
    pub label: Option<String>,
}

impl BookingRow {
    /// One booking per day in the row's pattern
    pub fn expand(&self, room_id: Uuid) -> impl Iterator<Item = LabeledBooking> + '_ {
        self.days.days().map(move |day| LabeledBooking {
            booking: Booking {
                room_id,
                day,
                semester: self.semester,
                time: self.time,
            },
            label: self.label.clone(),
        })
    }
}

pub fn read_bookings<R: Read>(reader: R) -> Result<Vec<BookingRow>, ImportError> {
    read_records::<BookingRecord, _>(reader)?
        .into_iter()
        .map(|(line, record)| -> Result<BookingRow, ImportError> {
            require(line, "campus", &record.campus)?;
            require(line, "room", &record.room)?;

            let days: DaySet = record
                .days
                .parse()
                .map_err(|e| ImportError::invalid(line, format!("{e}")))?;
            if days.is_empty() {
                return Err(ImportError::invalid(line, "days is empty"));
            }

            let time = TimeRange::from_strings(&record.start, &record.end).ok_or_else(|| {
                ImportError::invalid(
                    line,
                    format!("invalid time range {}-{}", record.start, record.end),
                )
            })?;

            Ok(BookingRow {
                line,
                semester: parse_semester(line, &record.semester)?,
                campus: record.campus,
                room: record.room,
                days,
                time,
                label: record.label.filter(|l| !l.is_empty()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{days::Day, semester::Season};

    #[test]
    fn test_read_semesters() {
        let csv = "semester,first_day,last_day\n\
                   Fall2024,2024-09-03,2024-12-20\n\
                   Winter 2025, 2025-01-06 ,2025-04-30\n";
        let semesters = read_semesters(csv.as_bytes()).unwrap();

        assert_eq!(semesters.len(), 2);
        assert_eq!(semesters[1].id, SemesterId::new(Season::Winter, 2025));
        assert_eq!(
            semesters[1].first_day,
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
        );
    }

    #[test]
    fn test_overlapping_semesters_are_rejected() {
        let csv = "semester,first_day,last_day\n\
                   Fall2024,2024-09-03,2025-01-10\n\
                   Winter2025,2025-01-06,2025-04-30\n";
        assert!(matches!(
            read_semesters(csv.as_bytes()),
            Err(ImportError::Calendar(_))
        ));
    }

    #[test]
    fn test_bad_date_reports_line() {
        let csv = "semester,first_day,last_day\n\
                   Fall2024,2024-09-03,2024-12-20\n\
                   Winter2025,06/01/2025,2025-04-30\n";
        match read_semesters(csv.as_bytes()) {
            Err(ImportError::Invalid { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected an invalid row, got {other:?}"),
        }
    }

    #[test]
    fn test_line_numbers_count_multiline_fields() {
        let csv = "campus,name,capacity,building,description\n\
                   Main,UA1350,30,UA,\"Lecture hall\nwith a projector\"\n\
                   Main,,12,,\n";
        match read_rooms(csv.as_bytes()) {
            Err(ImportError::Invalid { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected an invalid row, got {other:?}"),
        }
    }

    #[test]
    fn test_read_rooms() {
        let csv = "campus,name,capacity,building,description,id\n\
                   Main,UA1350,30,,Lecture hall,\n\
                   Main,SIRC2060,60,SIRC,,00000000-0000-0000-0000-000000002060\n";
        let rooms = read_rooms(csv.as_bytes()).unwrap();

        assert_eq!(rooms[0].building, "UA");
        assert_eq!(rooms[0].description.as_deref(), Some("Lecture hall"));
        assert_eq!(rooms[0].id, None);
        assert_eq!(rooms[1].id, Some(Uuid::from_u128(0x2060)));
        assert_eq!(rooms[1].description, None);
    }

    #[test]
    fn test_rooms_without_optional_columns() {
        let csv = "campus,name,capacity\nDowntown,DTA202,20\n";
        let rooms = read_rooms(csv.as_bytes()).unwrap();
        assert_eq!(rooms[0].building, "DTA");
        assert_eq!(rooms[0].line, 2);
    }

    #[test]
    fn test_read_bookings_expands_days() {
        let csv = "campus,room,days,semester,start,end,label\n\
                   Main,UA1350,MWF,Fall2024,13:00,14:00,CSCI 1060U\n";
        let rows = read_bookings(csv.as_bytes()).unwrap();
        let bookings: Vec<LabeledBooking> = rows[0].expand(Uuid::nil()).collect();

        let days: Vec<Day> = bookings.iter().map(|b| b.booking.day).collect();
        assert_eq!(days, [Day::Monday, Day::Wednesday, Day::Friday]);
        assert!(
            bookings
                .iter()
                .all(|b| b.label.as_deref() == Some("CSCI 1060U"))
        );
    }

    #[test]
    fn test_invalid_bookings() {
        let inverted = "campus,room,days,semester,start,end\n\
                        Main,UA1350,M,Fall2024,14:00,13:00\n";
        assert!(matches!(
            read_bookings(inverted.as_bytes()),
            Err(ImportError::Invalid { line: 2, .. })
        ));

        let bad_days = "campus,room,days,semester,start,end\n\
                        Main,UA1350,MXF,Fall2024,13:00,14:00\n";
        assert!(matches!(
            read_bookings(bad_days.as_bytes()),
            Err(ImportError::Invalid { .. })
        ));

        let bad_semester = "campus,room,days,semester,start,end\n\
                            Main,UA1350,M,Autumn2024,13:00,14:00\n";
        assert!(matches!(
            read_bookings(bad_semester.as_bytes()),
            Err(ImportError::Invalid { .. })
        ));
    }
}
