use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{ColumnType, TableColumn},
    error::OrganizerError,
    id::ColumnId,
};

/// A decoded min/max statistic, comparable against values of the same column.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum StatsValue {
    /// Boolean statistic.
    Boolean(bool),
    /// Integer statistic; 32-bit columns are widened.
    Int(i64),
    /// Floating-point statistic.
    Double(f64),
    /// Text statistic.
    Utf8(String),
}

impl StatsValue {
    /// Integer payload, if this is an integer statistic.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            StatsValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Text payload, if this is a text statistic.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StatsValue::Utf8(v) => Some(v.as_str()),
            _ => None,
        }
    }

    fn tag(&self) -> u8 {
        match self {
            StatsValue::Boolean(_) => 0,
            StatsValue::Int(_) => 1,
            StatsValue::Double(_) => 2,
            StatsValue::Utf8(_) => 3,
        }
    }
}

impl PartialEq for StatsValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for StatsValue {}

impl PartialOrd for StatsValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StatsValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (StatsValue::Boolean(lhs), StatsValue::Boolean(rhs)) => lhs.cmp(rhs),
            (StatsValue::Int(lhs), StatsValue::Int(rhs)) => lhs.cmp(rhs),
            (StatsValue::Double(lhs), StatsValue::Double(rhs)) => lhs.total_cmp(rhs),
            (StatsValue::Utf8(lhs), StatsValue::Utf8(rhs)) => lhs.cmp(rhs),
            _ => self.tag().cmp(&other.tag()),
        }
    }
}

impl From<bool> for StatsValue {
    fn from(value: bool) -> Self {
        StatsValue::Boolean(value)
    }
}

impl From<i64> for StatsValue {
    fn from(value: i64) -> Self {
        StatsValue::Int(value)
    }
}

impl From<f64> for StatsValue {
    fn from(value: f64) -> Self {
        StatsValue::Double(value)
    }
}

impl From<&str> for StatsValue {
    fn from(value: &str) -> Self {
        StatsValue::Utf8(value.to_owned())
    }
}

/// A statistic cell exactly as the statistics store persists it.
#[derive(Clone, Debug, PartialEq)]
pub enum RawStat {
    /// Boolean cell.
    Boolean(bool),
    /// 32-bit integer cell.
    Int(i32),
    /// 64-bit integer cell.
    Long(i64),
    /// Double cell.
    Double(f64),
    /// Variable-length byte cell.
    Bytes(Vec<u8>),
}

impl RawStat {
    /// Name of the physical kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            RawStat::Boolean(_) => "boolean",
            RawStat::Int(_) => "int",
            RawStat::Long(_) => "long",
            RawStat::Double(_) => "double",
            RawStat::Bytes(_) => "bytes",
        }
    }
}

impl From<bool> for RawStat {
    fn from(value: bool) -> Self {
        RawStat::Boolean(value)
    }
}

impl From<i32> for RawStat {
    fn from(value: i32) -> Self {
        RawStat::Int(value)
    }
}

impl From<i64> for RawStat {
    fn from(value: i64) -> Self {
        RawStat::Long(value)
    }
}

impl From<f64> for RawStat {
    fn from(value: f64) -> Self {
        RawStat::Double(value)
    }
}

impl From<&str> for RawStat {
    fn from(value: &str) -> Self {
        RawStat::Bytes(value.as_bytes().to_vec())
    }
}

/// Physical encoding of a column's statistics, resolved from its declared type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatsEncoding {
    /// Stored as a boolean.
    Boolean,
    /// Stored as a 32-bit integer.
    Int,
    /// Stored as a 64-bit integer.
    Long,
    /// Stored as a double.
    Double,
    /// Stored as bytes holding UTF-8 text.
    Utf8Bytes,
}

impl StatsEncoding {
    /// Resolve the encoding for a column, failing for types that keep no statistics.
    pub fn for_column(column: &TableColumn) -> Result<Self, OrganizerError> {
        match column.column_type {
            ColumnType::Boolean => Ok(StatsEncoding::Boolean),
            ColumnType::Integer | ColumnType::Date => Ok(StatsEncoding::Int),
            ColumnType::Bigint | ColumnType::Timestamp => Ok(StatsEncoding::Long),
            ColumnType::Double => Ok(StatsEncoding::Double),
            ColumnType::Varchar => Ok(StatsEncoding::Utf8Bytes),
            column_type @ (ColumnType::Real
            | ColumnType::Varbinary
            | ColumnType::Decimal { .. }) => Err(OrganizerError::UnsupportedStatsType {
                column_id: column.column_id,
                column_type,
            }),
        }
    }

    /// Name of the physical kind this encoding reads.
    pub fn kind(self) -> &'static str {
        match self {
            StatsEncoding::Boolean => "boolean",
            StatsEncoding::Int => "int",
            StatsEncoding::Long => "long",
            StatsEncoding::Double => "double",
            StatsEncoding::Utf8Bytes => "bytes",
        }
    }

    /// Decode one stored cell; a null cell means the statistic is absent.
    pub fn decode(
        self,
        column_id: ColumnId,
        raw: Option<&RawStat>,
    ) -> Result<Option<StatsValue>, OrganizerError> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        let value = match self {
            StatsEncoding::Boolean => decode_boolean(raw),
            StatsEncoding::Int => decode_int(raw),
            StatsEncoding::Long => decode_long(raw),
            StatsEncoding::Double => decode_double(raw),
            StatsEncoding::Utf8Bytes => decode_utf8(raw),
        };
        value
            .map(Some)
            .ok_or_else(|| OrganizerError::StatsTypeMismatch {
                column_id,
                expected: self.kind(),
                found: raw.kind(),
            })
    }
}

fn decode_boolean(raw: &RawStat) -> Option<StatsValue> {
    match raw {
        RawStat::Boolean(v) => Some(StatsValue::Boolean(*v)),
        _ => None,
    }
}

fn decode_int(raw: &RawStat) -> Option<StatsValue> {
    match raw {
        RawStat::Int(v) => Some(StatsValue::Int(i64::from(*v))),
        _ => None,
    }
}

fn decode_long(raw: &RawStat) -> Option<StatsValue> {
    match raw {
        RawStat::Long(v) => Some(StatsValue::Int(*v)),
        _ => None,
    }
}

fn decode_double(raw: &RawStat) -> Option<StatsValue> {
    match raw {
        RawStat::Double(v) => Some(StatsValue::Double(*v)),
        _ => None,
    }
}

fn decode_utf8(raw: &RawStat) -> Option<StatsValue> {
    match raw {
        RawStat::Bytes(bytes) => Some(StatsValue::Utf8(
            String::from_utf8_lossy(bytes).into_owned(),
        )),
        _ => None,
    }
}
