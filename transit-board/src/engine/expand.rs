//! Expansion of recurring timetables into today's departure instants.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::trace;

use crate::domain::{BucketScheme, DayBucket, LineSchedule, extract_clock_times};

/// Expand a line's timetable into concrete departure instants on `date`.
///
/// The list for the date's [`DayBucket`] is scanned entry by entry; every
/// valid "HH:MM" found is anchored on `date`. Entries without a valid time
/// contribute nothing, so an empty list or a "not operational" note yields
/// an empty result. Output is sorted ascending; equal instants keep their
/// timetable order.
pub fn expand_schedule(
    line: &LineSchedule,
    date: NaiveDate,
    scheme: BucketScheme,
) -> Vec<NaiveDateTime> {
    let bucket = DayBucket::for_date(date, scheme);
    let mut instants = Vec::new();

    for entry in line.times_for(bucket) {
        let times = extract_clock_times(entry);
        if times.is_empty() {
            trace!(line = %line.id, entry = %entry, "skipping timetable entry without a valid time");
            continue;
        }
        instants.extend(times.into_iter().map(|t| t.on(date)));
    }

    instants.sort();
    instants
}
