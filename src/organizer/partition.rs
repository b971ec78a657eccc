//! Bucket/day partitioning of eligible shards.
//!
//! Shards in different hash buckets must never be merged, and shards from
//! different calendar days stay apart so time pruning keeps its granularity.
//! Within one resulting group any subset may be compacted together.

use std::collections::BTreeMap;

use super::{DayFunction, ShardIndexInfo};
use crate::{
    catalog::Table,
    error::OrganizerError,
    id::BucketNumber,
    logging::{organizer_log, LogContext},
};

const PARTITION_LOG_CTX: LogContext = LogContext::component("partitioner");

/// Grouping policy derived from a table's static layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartitionRegime {
    /// Neither bucketed nor temporal: a single group.
    Unpartitioned,
    /// Bucketed only: one group per bucket.
    Bucketed,
    /// Temporal: one group per day, further split per bucket when bucketed.
    Daily {
        /// Whether day groups are split by bucket.
        bucketed: bool,
    },
}

impl PartitionRegime {
    /// Regime for a table.
    pub fn for_table(table: &Table) -> Self {
        match (table.is_temporal(), table.is_bucketed()) {
            (false, false) => PartitionRegime::Unpartitioned,
            (false, true) => PartitionRegime::Bucketed,
            (true, bucketed) => PartitionRegime::Daily { bucketed },
        }
    }

    fn name(self) -> &'static str {
        match self {
            PartitionRegime::Unpartitioned => "none",
            PartitionRegime::Bucketed => "bucket",
            PartitionRegime::Daily { bucketed: false } => "day",
            PartitionRegime::Daily { bucketed: true } => "day_bucket",
        }
    }
}

/// Split shards into disjoint groups that are safe to compact together.
///
/// Empty input yields no groups. Groups come out ordered by day, then bucket;
/// shards keep their input order within a group. On temporal tables a shard
/// without a temporal range is left out of every group.
pub fn partition<D>(
    table: &Table,
    shards: Vec<ShardIndexInfo>,
    days: &D,
) -> Result<Vec<Vec<ShardIndexInfo>>, OrganizerError>
where
    D: DayFunction + ?Sized,
{
    if shards.is_empty() {
        return Ok(Vec::new());
    }

    let regime = PartitionRegime::for_table(table);
    let groups = match regime {
        PartitionRegime::Unpartitioned => vec![shards],
        PartitionRegime::Bucketed => {
            let mut by_bucket: BTreeMap<Option<BucketNumber>, Vec<ShardIndexInfo>> =
                BTreeMap::new();
            for shard in shards {
                by_bucket.entry(shard.bucket_number()).or_default().push(shard);
            }
            by_bucket.into_values().collect()
        }
        PartitionRegime::Daily { bucketed } => {
            let mut by_day: BTreeMap<(i64, Option<BucketNumber>), Vec<ShardIndexInfo>> =
                BTreeMap::new();
            for shard in shards {
                let Some(range) = shard.temporal_range() else {
                    organizer_log!(
                        log::Level::Debug,
                        ctx: PARTITION_LOG_CTX,
                        "shard_without_temporal_range",
                        "table_id={} shard_uuid={}",
                        table.table_id(),
                        shard.shard_uuid(),
                    );
                    continue;
                };
                let day = days.day_from_range(range)?;
                let bucket = if bucketed { shard.bucket_number() } else { None };
                by_day.entry((day, bucket)).or_default().push(shard);
            }
            by_day.into_values().collect()
        }
    };

    organizer_log!(
        log::Level::Debug,
        ctx: PARTITION_LOG_CTX,
        "shards_partitioned",
        "table_id={} regime={} groups={}",
        table.table_id(),
        regime.name(),
        groups.len(),
    );
    Ok(groups)
}
