//! Read-only catalog records consumed by the planner.
//!
//! The planner never mutates any of these; they are snapshots supplied by the
//! catalog for the duration of one organization pass.

mod error;
mod memory;

use std::{fmt, sync::Arc};

pub use error::CatalogError;
pub use memory::MemoryCatalog;
use serde::{Deserialize, Serialize};

use crate::id::{BucketNumber, ColumnId, ShardId, ShardUuid, TableId};

/// Declared value type of a table column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Boolean.
    Boolean,
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    Bigint,
    /// 32-bit float.
    Real,
    /// 64-bit float.
    Double,
    /// Days since the Unix epoch.
    Date,
    /// Milliseconds since the Unix epoch.
    Timestamp,
    /// Variable-length UTF-8 text.
    Varchar,
    /// Variable-length opaque bytes.
    Varbinary,
    /// Fixed-point decimal.
    Decimal {
        /// Total digits.
        precision: u8,
        /// Digits after the decimal point.
        scale: u8,
    },
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Boolean => f.write_str("boolean"),
            ColumnType::Integer => f.write_str("integer"),
            ColumnType::Bigint => f.write_str("bigint"),
            ColumnType::Real => f.write_str("real"),
            ColumnType::Double => f.write_str("double"),
            ColumnType::Date => f.write_str("date"),
            ColumnType::Timestamp => f.write_str("timestamp"),
            ColumnType::Varchar => f.write_str("varchar"),
            ColumnType::Varbinary => f.write_str("varbinary"),
            ColumnType::Decimal { precision, scale } => {
                write!(f, "decimal({precision},{scale})")
            }
        }
    }
}

/// A declared column of a table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    /// Column identifier.
    pub column_id: ColumnId,
    /// Declared type, which determines how stored statistics decode.
    pub column_type: ColumnType,
}

impl TableColumn {
    /// Describe a column.
    pub fn new(column_id: ColumnId, column_type: ColumnType) -> Self {
        Self {
            column_id,
            column_type,
        }
    }
}

/// Static layout of a logical table as seen by one planning pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    table_id: TableId,
    bucket_count: Option<u32>,
    temporal_column_id: Option<ColumnId>,
}

impl Table {
    /// An unbucketed table with no temporal column.
    pub fn new(table_id: TableId) -> Self {
        Self {
            table_id,
            bucket_count: None,
            temporal_column_id: None,
        }
    }

    /// Mark the table as hash-bucketed into `bucket_count` buckets.
    pub fn with_bucket_count(self, bucket_count: u32) -> Self {
        Table {
            bucket_count: Some(bucket_count),
            ..self
        }
    }

    /// Mark the table as time-partitioned on `column_id`.
    pub fn with_temporal_column(self, column_id: ColumnId) -> Self {
        Table {
            temporal_column_id: Some(column_id),
            ..self
        }
    }

    /// Table identifier.
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Number of hash buckets, when bucketed.
    pub fn bucket_count(&self) -> Option<u32> {
        self.bucket_count
    }

    /// Temporal column, when time-partitioned.
    pub fn temporal_column_id(&self) -> Option<ColumnId> {
        self.temporal_column_id
    }

    /// Whether shards are hash-bucketed.
    pub fn is_bucketed(&self) -> bool {
        self.bucket_count.is_some()
    }

    /// Whether shards are time-partitioned.
    pub fn is_temporal(&self) -> bool {
        self.temporal_column_id.is_some()
    }
}

/// A catalogued physical shard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShardMetadata {
    /// Catalog-local id used to key statistics.
    pub shard_id: ShardId,
    /// Global shard identity.
    pub shard_uuid: ShardUuid,
    /// Owning table.
    pub table_id: TableId,
    /// Bucket the shard was routed to, for bucketed tables.
    pub bucket_number: Option<BucketNumber>,
    /// Rows stored in the shard.
    pub row_count: u64,
    /// Uncompressed byte size of the shard.
    pub uncompressed_size: u64,
}

/// Column lookups the planner needs from the table catalog.
///
/// Lookups are expected to hit an in-process snapshot, so they are synchronous.
pub trait TableCatalog: Send + Sync {
    /// Resolve one column of a table.
    fn table_column(
        &self,
        table_id: TableId,
        column_id: ColumnId,
    ) -> Result<TableColumn, CatalogError>;

    /// Declared sort columns of a table, in sort-key order.
    fn sort_columns(&self, table_id: TableId) -> Result<Vec<TableColumn>, CatalogError>;
}

impl<C: TableCatalog + ?Sized> TableCatalog for &C {
    fn table_column(
        &self,
        table_id: TableId,
        column_id: ColumnId,
    ) -> Result<TableColumn, CatalogError> {
        (**self).table_column(table_id, column_id)
    }

    fn sort_columns(&self, table_id: TableId) -> Result<Vec<TableColumn>, CatalogError> {
        (**self).sort_columns(table_id)
    }
}

impl<C: TableCatalog + ?Sized> TableCatalog for Arc<C> {
    fn table_column(
        &self,
        table_id: TableId,
        column_id: ColumnId,
    ) -> Result<TableColumn, CatalogError> {
        (**self).table_column(table_id, column_id)
    }

    fn sort_columns(&self, table_id: TableId) -> Result<Vec<TableColumn>, CatalogError> {
        (**self).sort_columns(table_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_layout_flags() {
        let plain = Table::new(1);
        assert!(!plain.is_bucketed());
        assert!(!plain.is_temporal());

        let layout = Table::new(2).with_bucket_count(8).with_temporal_column(4);
        assert_eq!(layout.bucket_count(), Some(8));
        assert_eq!(layout.temporal_column_id(), Some(4));
        assert!(layout.is_bucketed() && layout.is_temporal());
    }

    #[test]
    fn column_type_display() {
        assert_eq!(ColumnType::Varchar.to_string(), "varchar");
        assert_eq!(
            ColumnType::Decimal {
                precision: 10,
                scale: 2
            }
            .to_string(),
            "decimal(10,2)"
        );
    }
}
