//! Common fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use shard_organizer::{
    catalog::{ColumnType, MemoryCatalog, ShardMetadata, Table, TableColumn},
    id::{ColumnId, ShardId},
    stats::{MemoryStatsStore, RawStat},
};

/// Temporal column (millisecond timestamps).
pub const TS_COLUMN: ColumnId = 1;
/// First sort column.
pub const KEY_COLUMN: ColumnId = 2;
/// Second sort column.
pub const NAME_COLUMN: ColumnId = 3;

pub const DAY_MS: i64 = 86_400_000;

/// A catalog and statistics store seeded with one table.
pub struct Fixture {
    pub catalog: Arc<MemoryCatalog>,
    pub store: MemoryStatsStore,
    pub table: Table,
}

impl Fixture {
    /// Table with a timestamp column plus a `(bigint, varchar)` sort key.
    pub fn new(table: Table) -> Self {
        Self::with_backends(table, Arc::new(MemoryCatalog::new()), MemoryStatsStore::new())
    }

    /// Same layout as [`Fixture::new`], registered in existing backends.
    pub fn with_backends(
        table: Table,
        catalog: Arc<MemoryCatalog>,
        store: MemoryStatsStore,
    ) -> Self {
        catalog.create_table(
            table.clone(),
            vec![
                TableColumn::new(TS_COLUMN, ColumnType::Timestamp),
                TableColumn::new(KEY_COLUMN, ColumnType::Bigint),
                TableColumn::new(NAME_COLUMN, ColumnType::Varchar),
            ],
        );
        catalog
            .set_sort_columns(table.table_id(), &[KEY_COLUMN, NAME_COLUMN])
            .expect("sort columns should reference declared columns");
        Self {
            catalog,
            store,
            table,
        }
    }

    /// Register a shard with complete statistics, placed inside `day`.
    pub fn add_shard(&self, shard_id: ShardId, bucket: Option<u32>, day: i64) -> ShardMetadata {
        let table_id = self.table.table_id();
        let shard = self
            .catalog
            .register_shard(table_id, shard_id, bucket, 1_000, 4_096)
            .expect("table should be registered");
        self.store.put_stats(
            table_id,
            shard_id,
            TS_COLUMN,
            Some(RawStat::Long(day * DAY_MS + 60_000)),
            Some(RawStat::Long(day * DAY_MS + 120_000)),
        );
        self.store.put_stats(
            table_id,
            shard_id,
            KEY_COLUMN,
            Some(RawStat::Long(shard_id as i64)),
            Some(RawStat::Long(shard_id as i64 + 100)),
        );
        self.store.put_stats(
            table_id,
            shard_id,
            NAME_COLUMN,
            Some(RawStat::from("aardvark")),
            Some(RawStat::from("zebra")),
        );
        shard
    }

    /// All catalogued shards of the fixture table.
    pub fn shards(&self) -> Vec<ShardMetadata> {
        self.catalog
            .shards(self.table.table_id())
            .expect("table should be registered")
    }
}
