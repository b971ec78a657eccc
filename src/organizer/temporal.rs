use crate::{catalog::ColumnType, error::OrganizerError, stats::ShardRange};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Maps a shard's temporal range onto the calendar day it is filed under.
pub trait DayFunction: Send + Sync {
    /// Day key (days since the Unix epoch) for the range.
    fn day_from_range(&self, range: &ShardRange) -> Result<i64, OrganizerError>;
}

impl<F> DayFunction for F
where
    F: Fn(&ShardRange) -> Result<i64, OrganizerError> + Send + Sync,
{
    fn day_from_range(&self, range: &ShardRange) -> Result<i64, OrganizerError> {
        self(range)
    }
}

/// Default day derivation for `date` and millisecond `timestamp` columns.
///
/// A timestamp range inside one day maps to that day. A range touching two
/// adjacent days maps to whichever day holds more of it, the start day on a
/// tie. A wider range maps to its first full day.
#[derive(Clone, Copy, Debug, Default)]
pub struct CalendarDay;

impl DayFunction for CalendarDay {
    fn day_from_range(&self, range: &ShardRange) -> Result<i64, OrganizerError> {
        let (&[column_type], [min], [max]) = (
            range.types(),
            range.min_tuple().values(),
            range.max_tuple().values(),
        ) else {
            return Err(OrganizerError::TemporalType(format!(
                "expected a single temporal column, found {:?}",
                range.types()
            )));
        };
        let bounds = min.as_i64().zip(max.as_i64());
        match (column_type, bounds) {
            (ColumnType::Date, Some((day, _))) => Ok(day),
            (ColumnType::Timestamp, Some((start, end))) => Ok(determine_day(start, end)),
            _ => Err(OrganizerError::TemporalType(format!(
                "{column_type} range {min:?}..{max:?}"
            ))),
        }
    }
}

fn determine_day(start: i64, end: i64) -> i64 {
    let start_day = start / MILLIS_PER_DAY;
    let end_day = end / MILLIS_PER_DAY;
    if start_day == end_day {
        return start_day;
    }
    if end_day - start_day > 1 {
        return start_day + 1;
    }
    let boundary = end_day * MILLIS_PER_DAY;
    if boundary - start >= end - boundary {
        start_day
    } else {
        end_day
    }
}
