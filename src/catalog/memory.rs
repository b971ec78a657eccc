use std::{
    collections::{BTreeMap, HashMap},
    sync::Mutex,
};

use super::{CatalogError, ShardMetadata, Table, TableCatalog, TableColumn};
use crate::id::{BucketNumber, ColumnId, ShardId, ShardUuidGenerator, TableId};

#[derive(Debug)]
struct TableEntry {
    columns: BTreeMap<ColumnId, TableColumn>,
    sort_columns: Vec<ColumnId>,
    shards: BTreeMap<ShardId, ShardMetadata>,
}

/// In-process catalog holding tables, their columns, and their shards.
pub struct MemoryCatalog {
    tables: Mutex<HashMap<TableId, TableEntry>>,
    uuids: ShardUuidGenerator,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            uuids: ShardUuidGenerator::new(),
        }
    }

    /// Register a table and its columns, replacing any previous definition.
    pub fn create_table(&self, table: Table, columns: impl IntoIterator<Item = TableColumn>) {
        let columns = columns
            .into_iter()
            .map(|column| (column.column_id, column))
            .collect();
        let mut tables = self.lock();
        tables.insert(
            table.table_id(),
            TableEntry {
                columns,
                sort_columns: Vec::new(),
                shards: BTreeMap::new(),
            },
        );
    }

    /// Declare the sort key of a table; every id must name an existing column.
    pub fn set_sort_columns(
        &self,
        table_id: TableId,
        column_ids: &[ColumnId],
    ) -> Result<(), CatalogError> {
        let mut tables = self.lock();
        let entry = tables
            .get_mut(&table_id)
            .ok_or(CatalogError::TableNotFound(table_id))?;
        if let Some(&column_id) = column_ids
            .iter()
            .find(|id| !entry.columns.contains_key(id))
        {
            return Err(CatalogError::ColumnNotFound {
                table_id,
                column_id,
            });
        }
        entry.sort_columns = column_ids.to_vec();
        Ok(())
    }

    /// Catalog a new shard and assign it a fresh global identity.
    pub fn register_shard(
        &self,
        table_id: TableId,
        shard_id: ShardId,
        bucket_number: Option<BucketNumber>,
        row_count: u64,
        uncompressed_size: u64,
    ) -> Result<ShardMetadata, CatalogError> {
        let mut tables = self.lock();
        let entry = tables
            .get_mut(&table_id)
            .ok_or(CatalogError::TableNotFound(table_id))?;
        let shard = ShardMetadata {
            shard_id,
            shard_uuid: self.uuids.generate(),
            table_id,
            bucket_number,
            row_count,
            uncompressed_size,
        };
        entry.shards.insert(shard_id, shard.clone());
        Ok(shard)
    }

    /// All shards of a table, ordered by shard id.
    pub fn shards(&self, table_id: TableId) -> Result<Vec<ShardMetadata>, CatalogError> {
        self.lock()
            .get(&table_id)
            .map(|entry| entry.shards.values().cloned().collect())
            .ok_or(CatalogError::TableNotFound(table_id))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<TableId, TableEntry>> {
        self.tables
            .lock()
            .expect("catalog mutex should not be poisoned")
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TableCatalog for MemoryCatalog {
    fn table_column(
        &self,
        table_id: TableId,
        column_id: ColumnId,
    ) -> Result<TableColumn, CatalogError> {
        let tables = self.lock();
        let entry = tables
            .get(&table_id)
            .ok_or(CatalogError::TableNotFound(table_id))?;
        entry
            .columns
            .get(&column_id)
            .cloned()
            .ok_or(CatalogError::ColumnNotFound {
                table_id,
                column_id,
            })
    }

    fn sort_columns(&self, table_id: TableId) -> Result<Vec<TableColumn>, CatalogError> {
        let tables = self.lock();
        let entry = tables
            .get(&table_id)
            .ok_or(CatalogError::TableNotFound(table_id))?;
        Ok(entry
            .sort_columns
            .iter()
            .filter_map(|id| entry.columns.get(id).cloned())
            .collect())
    }
}
