use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::StatsValue;
use crate::{catalog::ColumnType, error::OrganizerError};

/// Fixed-arity list of typed statistic values, one per column of a dimension.
///
/// Tuples order lexicographically by value; the declared types travel along so
/// consumers (for example day derivation) can interpret the values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tuple {
    types: Vec<ColumnType>,
    values: Vec<StatsValue>,
}

impl Tuple {
    /// Pair declared types with values; both lists must have the same length.
    pub fn new(types: Vec<ColumnType>, values: Vec<StatsValue>) -> Result<Self, OrganizerError> {
        if types.len() != values.len() {
            return Err(OrganizerError::RangeArity(format!(
                "{} types for {} values",
                types.len(),
                values.len()
            )));
        }
        Ok(Self { types, values })
    }

    /// Declared types, in column order.
    pub fn types(&self) -> &[ColumnType] {
        &self.types
    }

    /// Values, in column order.
    pub fn values(&self) -> &[StatsValue] {
        &self.values
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the tuple covers no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PartialEq for Tuple {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Tuple {}

impl PartialOrd for Tuple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tuple {
    fn cmp(&self, other: &Self) -> Ordering {
        for (lhs, rhs) in self.values.iter().zip(other.values.iter()) {
            let ord = lhs.cmp(rhs);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.values.len().cmp(&other.values.len())
    }
}
