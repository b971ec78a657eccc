use serde::{Deserialize, Serialize};

use super::Tuple;
use crate::{catalog::ColumnType, error::OrganizerError};

/// Inclusive value range a shard covers along one statistics dimension.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardRange {
    min: Tuple,
    max: Tuple,
}

impl ShardRange {
    /// Build a range; both bounds must describe the same columns.
    pub fn new(min: Tuple, max: Tuple) -> Result<Self, OrganizerError> {
        if min.types() != max.types() {
            return Err(OrganizerError::RangeArity(format!(
                "min types {:?} differ from max types {:?}",
                min.types(),
                max.types()
            )));
        }
        Ok(Self { min, max })
    }

    /// Low bound.
    pub fn min_tuple(&self) -> &Tuple {
        &self.min
    }

    /// High bound.
    pub fn max_tuple(&self) -> &Tuple {
        &self.max
    }

    /// Declared column types shared by both bounds.
    pub fn types(&self) -> &[ColumnType] {
        self.min.types()
    }

    /// Whether the two inclusive ranges share at least one point.
    pub fn overlaps(&self, other: &ShardRange) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    /// Smallest range covering both `self` and `other`.
    pub fn span(&self, other: &ShardRange) -> ShardRange {
        ShardRange {
            min: (&self.min).min(&other.min).clone(),
            max: (&self.max).max(&other.max).clone(),
        }
    }

    /// Whether one range ends exactly where the other begins.
    pub fn adjacent(&self, other: &ShardRange) -> bool {
        self.max == other.min || other.max == self.min
    }
}
