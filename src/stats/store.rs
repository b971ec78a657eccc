use std::{collections::HashMap, future::Future};

use thiserror::Error;

use super::{RawStat, StatsEncoding};
use crate::id::{ColumnId, ShardId, TableId};

/// Errors surfaced by a statistics store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No session could be opened.
    #[error("statistics store unavailable: {0}")]
    Unavailable(String),
    /// A lookup was issued but failed.
    #[error("statistics lookup failed: {0}")]
    Query(String),
}

/// One statistics column requested from the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StatsColumn {
    /// Column whose min/max is requested.
    pub column_id: ColumnId,
    /// Physical encoding the min/max cells are expected in.
    pub encoding: StatsEncoding,
}

/// Stored min/max cells of one column; `None` is a null cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnStats {
    /// Minimum value cell.
    pub min: Option<RawStat>,
    /// Maximum value cell.
    pub max: Option<RawStat>,
}

/// Statistics of one shard, restricted to the requested columns.
#[derive(Clone, Debug, PartialEq)]
pub struct StatsRow {
    /// Shard the statistics belong to.
    pub shard_id: ShardId,
    columns: HashMap<ColumnId, ColumnStats>,
}

impl StatsRow {
    /// A row with every column null.
    pub fn new(shard_id: ShardId) -> Self {
        Self {
            shard_id,
            columns: HashMap::new(),
        }
    }

    /// Attach the cells of one column.
    pub fn with_column(mut self, column_id: ColumnId, stats: ColumnStats) -> Self {
        self.columns.insert(column_id, stats);
        self
    }

    /// Minimum cell of a column, `None` when null or not returned.
    pub fn min(&self, column_id: ColumnId) -> Option<&RawStat> {
        self.columns.get(&column_id).and_then(|s| s.min.as_ref())
    }

    /// Maximum cell of a column, `None` when null or not returned.
    pub fn max(&self, column_id: ColumnId) -> Option<&RawStat> {
        self.columns.get(&column_id).and_then(|s| s.max.as_ref())
    }
}

/// Source of persisted per-shard column statistics.
///
/// Lookups go through a [`StatsSession`] obtained from [`StatsStore::open`]. The
/// session owns whatever connection backs it and must release it on drop, so a
/// caller that bails out early still returns the connection.
pub trait StatsStore: Send + Sync {
    /// Scoped handle used to issue lookups.
    type Session: StatsSession + Send;

    /// Acquire a session.
    fn open(&self) -> impl Future<Output = Result<Self::Session, StoreError>> + Send;
}

/// A scoped connection to the statistics store.
pub trait StatsSession {
    /// Fetch min/max cells for `columns` of each shard in `shard_ids`.
    ///
    /// Returns one row per shard that has statistics; shards without a row are
    /// simply absent. Callers bound `shard_ids` themselves.
    fn lookup(
        &mut self,
        table_id: TableId,
        shard_ids: &[ShardId],
        columns: &[StatsColumn],
    ) -> impl Future<Output = Result<Vec<StatsRow>, StoreError>> + Send;
}

impl<S: StatsStore + ?Sized> StatsStore for &S {
    type Session = S::Session;

    fn open(&self) -> impl Future<Output = Result<Self::Session, StoreError>> + Send {
        (**self).open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_reports_null_for_missing_columns() {
        let row = StatsRow::new(4).with_column(
            1,
            ColumnStats {
                min: Some(RawStat::Long(10)),
                max: None,
            },
        );
        assert_eq!(row.min(1), Some(&RawStat::Long(10)));
        assert_eq!(row.max(1), None);
        assert_eq!(row.min(2), None);
    }
}
