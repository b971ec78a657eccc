//! In-process statistics store.
//!
//! Keeps per-shard min/max cells in memory and hands out sessions bounded by a
//! semaphore. Every lookup is recorded so callers can inspect batching, and a
//! lookup can be armed to fail to exercise abort paths.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::{ColumnStats, RawStat, StatsColumn, StatsRow, StatsSession, StatsStore, StoreError};
use crate::id::{ColumnId, ShardId, TableId};

const DEFAULT_MAX_SESSIONS: usize = 16;

type ShardStats = BTreeMap<ShardId, HashMap<ColumnId, ColumnStats>>;

/// A lookup as received by the store.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupRecord {
    /// Table queried.
    pub table_id: TableId,
    /// Shard ids in the request, in request order.
    pub shard_ids: Vec<ShardId>,
    /// Columns requested.
    pub columns: Vec<StatsColumn>,
}

#[derive(Debug)]
struct StoreInner {
    tables: Mutex<HashMap<TableId, ShardStats>>,
    lookups: Mutex<Vec<LookupRecord>>,
    fail_at: Mutex<Option<usize>>,
    sessions: Arc<Semaphore>,
    open_sessions: AtomicUsize,
}

/// Statistics store backed by process memory.
#[derive(Clone, Debug)]
pub struct MemoryStatsStore {
    inner: Arc<StoreInner>,
}

impl MemoryStatsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::with_max_sessions(DEFAULT_MAX_SESSIONS)
    }

    /// Create an empty store allowing at most `max_sessions` concurrent sessions.
    pub fn with_max_sessions(max_sessions: usize) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                tables: Mutex::new(HashMap::new()),
                lookups: Mutex::new(Vec::new()),
                fail_at: Mutex::new(None),
                sessions: Arc::new(Semaphore::new(max_sessions.max(1))),
                open_sessions: AtomicUsize::new(0),
            }),
        }
    }

    /// Store the min/max cells of one column of one shard.
    pub fn put_stats(
        &self,
        table_id: TableId,
        shard_id: ShardId,
        column_id: ColumnId,
        min: Option<RawStat>,
        max: Option<RawStat>,
    ) {
        let mut tables = lock(&self.inner.tables);
        tables
            .entry(table_id)
            .or_default()
            .entry(shard_id)
            .or_default()
            .insert(column_id, ColumnStats { min, max });
    }

    /// Make the lookup with the given zero-based ordinal fail.
    pub fn fail_lookup(&self, ordinal: usize) {
        *lock(&self.inner.fail_at) = Some(ordinal);
    }

    /// Refuse all future sessions.
    pub fn close(&self) {
        self.inner.sessions.close();
    }

    /// Every lookup received so far, including failed ones.
    pub fn lookups(&self) -> Vec<LookupRecord> {
        lock(&self.inner.lookups).clone()
    }

    /// Sessions currently held by callers.
    pub fn open_sessions(&self) -> usize {
        self.inner.open_sessions.load(Ordering::Acquire)
    }
}

impl Default for MemoryStatsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsStore for MemoryStatsStore {
    type Session = MemoryStatsSession;

    async fn open(&self) -> Result<Self::Session, StoreError> {
        let permit = Arc::clone(&self.inner.sessions)
            .acquire_owned()
            .await
            .map_err(|_| StoreError::Unavailable("session pool closed".to_string()))?;
        self.inner.open_sessions.fetch_add(1, Ordering::AcqRel);
        Ok(MemoryStatsSession {
            inner: Arc::clone(&self.inner),
            _permit: permit,
        })
    }
}

/// Session handed out by [`MemoryStatsStore`]; releases its slot on drop.
#[derive(Debug)]
pub struct MemoryStatsSession {
    inner: Arc<StoreInner>,
    _permit: OwnedSemaphorePermit,
}

impl StatsSession for MemoryStatsSession {
    async fn lookup(
        &mut self,
        table_id: TableId,
        shard_ids: &[ShardId],
        columns: &[StatsColumn],
    ) -> Result<Vec<StatsRow>, StoreError> {
        let ordinal = {
            let mut lookups = lock(&self.inner.lookups);
            lookups.push(LookupRecord {
                table_id,
                shard_ids: shard_ids.to_vec(),
                columns: columns.to_vec(),
            });
            lookups.len() - 1
        };
        if *lock(&self.inner.fail_at) == Some(ordinal) {
            return Err(StoreError::Query(format!(
                "injected failure on lookup {ordinal}"
            )));
        }

        let tables = lock(&self.inner.tables);
        let Some(shards) = tables.get(&table_id) else {
            return Err(StoreError::Query(format!(
                "no shard index for table {table_id}"
            )));
        };
        let rows = shard_ids
            .iter()
            .filter_map(|shard_id| {
                let stored = shards.get(shard_id)?;
                let row = columns.iter().fold(StatsRow::new(*shard_id), |row, column| {
                    let stats = stored.get(&column.column_id).cloned().unwrap_or_default();
                    row.with_column(column.column_id, stats)
                });
                Some(row)
            })
            .collect();
        Ok(rows)
    }
}

impl Drop for MemoryStatsSession {
    fn drop(&mut self) {
        self.inner.open_sessions.fetch_sub(1, Ordering::AcqRel);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .expect("statistics store mutex should not be poisoned")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatsEncoding;

    const COLUMN: StatsColumn = StatsColumn {
        column_id: 1,
        encoding: StatsEncoding::Long,
    };

    #[tokio::test]
    async fn lookup_returns_only_shards_with_stats() {
        let store = MemoryStatsStore::new();
        store.put_stats(3, 10, 1, Some(RawStat::Long(1)), Some(RawStat::Long(5)));
        store.put_stats(3, 12, 2, Some(RawStat::Long(0)), None);

        let mut session = store.open().await.expect("session");
        let rows = session
            .lookup(3, &[10, 11, 12], &[COLUMN])
            .await
            .expect("lookup");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].shard_id, 10);
        assert_eq!(rows[0].max(1), Some(&RawStat::Long(5)));
        assert_eq!(rows[1].shard_id, 12);
        assert_eq!(rows[1].min(1), None);
        assert_eq!(store.lookups().len(), 1);
    }

    #[tokio::test]
    async fn sessions_are_released_on_drop() {
        let store = MemoryStatsStore::with_max_sessions(1);
        let session = store.open().await.expect("session");
        assert_eq!(store.open_sessions(), 1);
        drop(session);
        assert_eq!(store.open_sessions(), 0);
        let _again = store.open().await.expect("slot released");
    }

    #[tokio::test]
    async fn armed_failure_hits_the_chosen_lookup() {
        let store = MemoryStatsStore::new();
        store.put_stats(1, 1, 1, Some(RawStat::Long(1)), Some(RawStat::Long(1)));
        store.fail_lookup(1);

        let mut session = store.open().await.expect("session");
        session.lookup(1, &[1], &[COLUMN]).await.expect("first");
        let err = session.lookup(1, &[1], &[COLUMN]).await.unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));
    }

    #[tokio::test]
    async fn closed_store_refuses_sessions() {
        let store = MemoryStatsStore::new();
        store.close();
        assert!(matches!(
            store.open().await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
