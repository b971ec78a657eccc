use thiserror::Error;

use crate::{
    catalog::{CatalogError, ColumnType},
    id::{BucketNumber, ColumnId, ShardId, TableId},
    stats::StoreError,
};

/// Fatal conditions raised while planning organization for one table.
///
/// None of these are retried locally: the whole planning pass for the table is
/// abandoned and no partial result is returned.
#[derive(Debug, Error)]
pub enum OrganizerError {
    /// The statistics store failed a session or lookup.
    #[error("statistics store error: {0}")]
    Store(#[from] StoreError),
    /// Table or column metadata could not be resolved.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// A column's declared type has no statistics decoding rule.
    #[error("unsupported statistics type {column_type} for column {column_id}")]
    UnsupportedStatsType {
        /// Column carrying the statistic.
        column_id: ColumnId,
        /// Declared type with no decoding rule.
        column_type: ColumnType,
    },
    /// A stored statistic does not have the physical kind its column type implies.
    #[error("statistic for column {column_id} is stored as {found}, expected {expected}")]
    StatsTypeMismatch {
        /// Column carrying the statistic.
        column_id: ColumnId,
        /// Physical kind the declared type decodes from.
        expected: &'static str,
        /// Physical kind actually stored.
        found: &'static str,
    },
    /// The store answered with a shard that was not part of the lookup.
    #[error("statistics returned for shard {shard_id} which was not requested")]
    UnknownShard {
        /// Shard id found in the response.
        shard_id: ShardId,
    },
    /// The same shard id was passed to the loader more than once.
    #[error("shard {shard_id} appears more than once in the input")]
    DuplicateShard {
        /// Repeated shard id.
        shard_id: ShardId,
    },
    /// The two bounds of a range do not share one column layout.
    #[error("range bounds disagree on column layout: {0}")]
    RangeArity(String),
    /// A temporal range cannot be mapped onto a calendar day.
    #[error("cannot derive a day from temporal range: {0}")]
    TemporalType(String),
    /// An organization set was requested over zero or several buckets.
    #[error("organization set for table {table_id} needs exactly one bucket, found {buckets:?}")]
    BucketInvariant {
        /// Table the set was requested for.
        table_id: TableId,
        /// Distinct bucket numbers present in the requested shards.
        buckets: Vec<Option<BucketNumber>>,
    },
}
