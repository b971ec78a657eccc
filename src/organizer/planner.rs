use super::{
    load_eligible_shards, partition, CalendarDay, CompactionSetCreator, DayFunction,
    OrganizationSet, ShardIndexInfo,
};
use crate::{
    catalog::{ShardMetadata, Table, TableCatalog},
    error::OrganizerError,
    logging::{organizer_log, LogContext},
    option::OrganizerOptions,
    stats::StatsStore,
};

const PLANNER_LOG_CTX: LogContext = LogContext::component("planner");

/// Per-table organization planner: load, partition, select, build.
///
/// Holds no state between calls, so one instance may plan many tables
/// concurrently.
#[derive(Debug)]
pub struct ShardOrganizer<C, S, D = CalendarDay> {
    catalog: C,
    store: S,
    days: D,
    options: OrganizerOptions,
}

impl<C, S> ShardOrganizer<C, S, CalendarDay>
where
    C: TableCatalog,
    S: StatsStore,
{
    /// Planner with default options and calendar-day partitioning.
    pub fn new(catalog: C, store: S) -> Self {
        Self {
            catalog,
            store,
            days: CalendarDay,
            options: OrganizerOptions::default(),
        }
    }
}

impl<C, S, D> ShardOrganizer<C, S, D>
where
    C: TableCatalog,
    S: StatsStore,
    D: DayFunction,
{
    /// Replace the day derivation used for temporal tables.
    pub fn with_day_function<E: DayFunction>(self, days: E) -> ShardOrganizer<C, S, E> {
        ShardOrganizer {
            catalog: self.catalog,
            store: self.store,
            days,
            options: self.options,
        }
    }

    /// Replace the planning options.
    pub fn with_options(self, options: OrganizerOptions) -> Self {
        ShardOrganizer { options, ..self }
    }

    /// Shards of `table` with complete statistics, per the configured options.
    pub async fn eligible_shards(
        &self,
        table: &Table,
        shards: &[ShardMetadata],
    ) -> Result<Vec<ShardIndexInfo>, OrganizerError> {
        load_eligible_shards(
            &self.catalog,
            &self.store,
            table,
            shards,
            self.options.include_sort_columns,
        )
        .await
    }

    /// Partition eligible shards with the configured day derivation.
    pub fn partition(
        &self,
        table: &Table,
        shards: Vec<ShardIndexInfo>,
    ) -> Result<Vec<Vec<ShardIndexInfo>>, OrganizerError> {
        partition(table, shards, &self.days)
    }

    /// Plan every organization set for one table.
    ///
    /// Any fatal condition aborts the pass and no sets are returned.
    pub async fn plan(
        &self,
        table: &Table,
        shards: &[ShardMetadata],
    ) -> Result<Vec<OrganizationSet>, OrganizerError> {
        let eligible = self.eligible_shards(table, shards).await?;
        let groups = self.partition(table, eligible)?;
        let creator = CompactionSetCreator::new(&self.options);
        let mut sets = Vec::new();
        for group in &groups {
            sets.extend(creator.create_sets(table.table_id(), group)?);
        }
        organizer_log!(
            log::Level::Info,
            ctx: PLANNER_LOG_CTX,
            "organization_planned",
            "table_id={} groups={} sets={} shards={}",
            table.table_id(),
            groups.len(),
            sets.len(),
            sets.iter().map(|set| set.shards().len()).sum::<usize>(),
        );
        Ok(sets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{ColumnType, MemoryCatalog, TableColumn},
        stats::{MemoryStatsStore, RawStat, ShardRange},
    };

    const DAY: i64 = 86_400_000;

    #[tokio::test]
    async fn plans_one_set_per_day_bucket() {
        let catalog = MemoryCatalog::new();
        let table = Table::new(3).with_bucket_count(2).with_temporal_column(1);
        catalog.create_table(table.clone(), vec![TableColumn::new(1, ColumnType::Timestamp)]);
        let store = MemoryStatsStore::new();
        let mut shards = Vec::new();
        for id in 0..8u64 {
            let bucket = (id % 2) as u32;
            let day = (id / 4) as i64;
            shards.push(catalog.register_shard(3, id, Some(bucket), 10, 10).expect("shard"));
            store.put_stats(
                3,
                id,
                1,
                Some(RawStat::Long(day * DAY + 1)),
                Some(RawStat::Long(day * DAY + 2)),
            );
        }

        let organizer = ShardOrganizer::new(&catalog, store.clone());
        let sets = organizer.plan(&table, &shards).await.expect("plan");

        assert_eq!(sets.len(), 4);
        for set in &sets {
            assert_eq!(set.shards().len(), 2);
        }
        assert_eq!(store.open_sessions(), 0);
    }

    #[tokio::test]
    async fn custom_day_function_drives_grouping() {
        let catalog = MemoryCatalog::new();
        let table = Table::new(3).with_temporal_column(1);
        catalog.create_table(table.clone(), vec![TableColumn::new(1, ColumnType::Date)]);
        let store = MemoryStatsStore::new();
        let mut shards = Vec::new();
        for id in 0..4u64 {
            shards.push(catalog.register_shard(3, id, None, 10, 10).expect("shard"));
            store.put_stats(3, id, 1, Some(RawStat::Int(id as i32)), Some(RawStat::Int(9)));
        }

        let organizer = ShardOrganizer::new(&catalog, &store).with_day_function(
            |_: &ShardRange| -> Result<i64, OrganizerError> { Ok(0) },
        );
        let sets = organizer.plan(&table, &shards).await.expect("plan");

        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].shards().len(), 4);
    }

    #[tokio::test]
    async fn store_failure_aborts_the_pass() {
        let catalog = MemoryCatalog::new();
        let table = Table::new(3);
        catalog.create_table(table.clone(), vec![TableColumn::new(1, ColumnType::Bigint)]);
        let shards = vec![catalog.register_shard(3, 1, None, 1, 1).expect("shard")];
        let store = MemoryStatsStore::new();
        store.put_stats(3, 1, 1, Some(RawStat::Long(1)), Some(RawStat::Long(1)));
        store.fail_lookup(0);

        let organizer = ShardOrganizer::new(&catalog, &store)
            .with_options(OrganizerOptions::default().min_shards_per_set(1));
        let err = organizer.plan(&table, &shards).await.unwrap_err();

        assert!(matches!(err, OrganizerError::Store(_)));
        assert_eq!(store.open_sessions(), 0);
    }
}
