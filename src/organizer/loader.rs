//! Statistics loading: turns catalogued shards into planning records.
//!
//! Statistics are fetched in chunks of [`LOOKUP_BATCH_SIZE`] shard ids through a
//! single store session. A shard survives only when every required dimension
//! (sort key and/or temporal column) has both a min and a max for each of its
//! columns; anything less drops the shard for this pass without an error.

use std::collections::{HashMap, HashSet};

use super::ShardIndexInfo;
use crate::{
    catalog::{ColumnType, ShardMetadata, Table, TableCatalog, TableColumn},
    error::OrganizerError,
    id::{ColumnId, ShardId},
    logging::{organizer_log, LogContext},
    stats::{ShardRange, StatsColumn, StatsEncoding, StatsRow, StatsSession, StatsStore, Tuple},
};

/// Maximum number of shard ids sent in one statistics lookup.
pub const LOOKUP_BATCH_SIZE: usize = 1000;

const LOADER_LOG_CTX: LogContext = LogContext::component("stats_loader");

#[derive(Debug, Clone, Copy)]
struct DimensionColumn {
    column_id: ColumnId,
    column_type: ColumnType,
    encoding: StatsEncoding,
}

/// Ordered columns making up one statistics dimension.
#[derive(Debug, Clone)]
struct StatsDimension {
    name: &'static str,
    columns: Vec<DimensionColumn>,
}

impl StatsDimension {
    fn resolve(name: &'static str, columns: &[TableColumn]) -> Result<Self, OrganizerError> {
        let columns = columns
            .iter()
            .map(|column| {
                Ok(DimensionColumn {
                    column_id: column.column_id,
                    column_type: column.column_type,
                    encoding: StatsEncoding::for_column(column)?,
                })
            })
            .collect::<Result<Vec<_>, OrganizerError>>()?;
        Ok(Self { name, columns })
    }

    fn stats_columns(&self) -> impl Iterator<Item = StatsColumn> + '_ {
        self.columns.iter().map(|column| StatsColumn {
            column_id: column.column_id,
            encoding: column.encoding,
        })
    }

    /// Decode the dimension's range, or `None` if any bound is null.
    fn range(&self, row: &StatsRow) -> Result<Option<ShardRange>, OrganizerError> {
        let mut types = Vec::with_capacity(self.columns.len());
        let mut mins = Vec::with_capacity(self.columns.len());
        let mut maxs = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let min = column
                .encoding
                .decode(column.column_id, row.min(column.column_id))?;
            let max = column
                .encoding
                .decode(column.column_id, row.max(column.column_id))?;
            let (Some(min), Some(max)) = (min, max) else {
                return Ok(None);
            };
            types.push(column.column_type);
            mins.push(min);
            maxs.push(max);
        }
        let range = ShardRange::new(Tuple::new(types.clone(), mins)?, Tuple::new(types, maxs)?)?;
        Ok(Some(range))
    }
}

/// Load planning records for the shards of `table` whose required statistics are complete.
///
/// The temporal range is required whenever the table has a temporal column; the
/// sort-key range is required when `include_sort_columns` is set. Any store or
/// decoding failure aborts the whole call.
pub async fn load_eligible_shards<C, S>(
    catalog: &C,
    store: &S,
    table: &Table,
    shards: &[ShardMetadata],
    include_sort_columns: bool,
) -> Result<Vec<ShardIndexInfo>, OrganizerError>
where
    C: TableCatalog + ?Sized,
    S: StatsStore,
{
    let table_id = table.table_id();

    let temporal = match table.temporal_column_id() {
        Some(column_id) => {
            let column = catalog.table_column(table_id, column_id)?;
            Some(StatsDimension::resolve(
                "temporal",
                std::slice::from_ref(&column),
            )?)
        }
        None => None,
    };
    let sort = if include_sort_columns {
        let columns = catalog.sort_columns(table_id)?;
        Some(StatsDimension::resolve("sort", &columns)?)
    } else {
        None
    };

    let mut columns: Vec<StatsColumn> = Vec::new();
    for column in temporal
        .iter()
        .chain(sort.iter())
        .flat_map(StatsDimension::stats_columns)
    {
        if !columns.contains(&column) {
            columns.push(column);
        }
    }

    if shards.is_empty() {
        return Ok(Vec::new());
    }

    let mut shards_by_id: HashMap<ShardId, &ShardMetadata> =
        HashMap::with_capacity(shards.len());
    for shard in shards {
        if shards_by_id.insert(shard.shard_id, shard).is_some() {
            return Err(OrganizerError::DuplicateShard {
                shard_id: shard.shard_id,
            });
        }
    }
    let mut eligible = Vec::new();
    let mut session = store.open().await?;

    for (batch, chunk) in shards.chunks(LOOKUP_BATCH_SIZE).enumerate() {
        let shard_ids: Vec<ShardId> = chunk.iter().map(|shard| shard.shard_id).collect();
        let rows = match session.lookup(table_id, &shard_ids, &columns).await {
            Ok(rows) => rows,
            Err(err) => {
                organizer_log!(
                    log::Level::Warn,
                    ctx: LOADER_LOG_CTX,
                    "stats_lookup_failed",
                    "table_id={} batch={} error={}",
                    table_id,
                    batch,
                    err,
                );
                return Err(err.into());
            }
        };
        organizer_log!(
            log::Level::Debug,
            ctx: LOADER_LOG_CTX,
            "stats_lookup_batch",
            "table_id={} batch={} shards={} rows={}",
            table_id,
            batch,
            shard_ids.len(),
            rows.len(),
        );

        let requested: HashSet<ShardId> = shard_ids.into_iter().collect();
        for row in rows {
            let metadata = match shards_by_id.get(&row.shard_id) {
                Some(metadata) if requested.contains(&row.shard_id) => *metadata,
                _ => {
                    return Err(OrganizerError::UnknownShard {
                        shard_id: row.shard_id,
                    })
                }
            };
            let Some(sort_range) = required_range(sort.as_ref(), &row)? else {
                continue;
            };
            let Some(temporal_range) = required_range(temporal.as_ref(), &row)? else {
                continue;
            };
            eligible.push(ShardIndexInfo::new(metadata, sort_range, temporal_range));
        }
    }

    organizer_log!(
        log::Level::Info,
        ctx: LOADER_LOG_CTX,
        "eligible_shards_loaded",
        "table_id={} requested={} eligible={}",
        table_id,
        shards.len(),
        eligible.len(),
    );
    Ok(eligible)
}

/// `Some(None)` when the dimension is not required, `None` when it is required
/// but incomplete.
fn required_range(
    dimension: Option<&StatsDimension>,
    row: &StatsRow,
) -> Result<Option<Option<ShardRange>>, OrganizerError> {
    let Some(dimension) = dimension else {
        return Ok(Some(None));
    };
    match dimension.range(row)? {
        Some(range) => Ok(Some(Some(range))),
        None => {
            organizer_log!(
                log::Level::Debug,
                ctx: LOADER_LOG_CTX,
                "shard_stats_incomplete",
                "shard_id={} dimension={}",
                row.shard_id,
                dimension.name,
            );
            Ok(None)
        }
    }
}
