//! Line schedules as supplied by the data layer.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a bus line.
///
/// The data layer hands out either numeric or textual ids; both are
/// normalized to their string form.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LineId(String);

impl LineId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for LineId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => LineId(n.to_string()),
            RawId::Text(s) => LineId(s),
        })
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One bus line with its recurring timetable.
///
/// Time lists hold free-text entries, normally "HH:MM". Entries that do not
/// contain a valid time are ignored during expansion; a list may also be
/// empty or hold a single "not operational" note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSchedule {
    pub id: LineId,
    pub line_name: String,
    #[serde(default)]
    pub line_code: String,
    #[serde(default)]
    pub point_a: String,
    #[serde(default)]
    pub point_b: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub times_weekday: Vec<String>,
    #[serde(default)]
    pub times_saturday: Vec<String>,
    #[serde(default)]
    pub times_sunday: Vec<String>,
}

impl LineSchedule {
    /// Returns the timetable entries for a day bucket.
    pub fn times_for(&self, bucket: DayBucket) -> &[String] {
        match bucket {
            DayBucket::Weekday => &self.times_weekday,
            DayBucket::Saturday => &self.times_saturday,
            DayBucket::Sunday => &self.times_sunday,
        }
    }
}

/// How days of the week map onto timetable lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BucketScheme {
    /// Monday-Friday, Saturday and Sunday each have their own list.
    #[default]
    ThreeBucket,
    /// Monday-Friday share one list, the weekend shares `times_saturday`.
    WeekdayWeekend,
}

/// Which timetable list applies to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayBucket {
    Weekday,
    Saturday,
    Sunday,
}

impl DayBucket {
    /// Select the bucket for a calendar date.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_board::domain::{BucketScheme, DayBucket};
    /// use chrono::NaiveDate;
    ///
    /// let monday = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();
    /// let sunday = NaiveDate::from_ymd_opt(2024, 3, 24).unwrap();
    ///
    /// assert_eq!(DayBucket::for_date(monday, BucketScheme::ThreeBucket), DayBucket::Weekday);
    /// assert_eq!(DayBucket::for_date(sunday, BucketScheme::ThreeBucket), DayBucket::Sunday);
    /// assert_eq!(DayBucket::for_date(sunday, BucketScheme::WeekdayWeekend), DayBucket::Saturday);
    /// ```
    pub fn for_date(date: NaiveDate, scheme: BucketScheme) -> Self {
        match (date.weekday(), scheme) {
            (Weekday::Sat, _) => DayBucket::Saturday,
            (Weekday::Sun, BucketScheme::ThreeBucket) => DayBucket::Sunday,
            (Weekday::Sun, BucketScheme::WeekdayWeekend) => DayBucket::Saturday,
            _ => DayBucket::Weekday,
        }
    }
}
