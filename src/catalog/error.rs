use thiserror::Error;

use crate::id::{ColumnId, TableId};

/// Errors raised by catalog lookups.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No table with the given id is catalogued.
    #[error("table {0} not found")]
    TableNotFound(TableId),
    /// The table exists but has no column with the given id.
    #[error("column {column_id} not found in table {table_id}")]
    ColumnNotFound {
        /// Table searched.
        table_id: TableId,
        /// Column requested.
        column_id: ColumnId,
    },
}
