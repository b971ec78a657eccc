use std::cmp::Ordering;

use super::{build_organization_set, OrganizationSet, ShardIndexInfo};
use crate::{
    error::OrganizerError,
    id::TableId,
    option::OrganizerOptions,
    stats::{ShardRange, Tuple},
};

/// Greedy, size-bounded selection of organization sets within one partition group.
///
/// Shards are walked in range order (temporal low bound, then sort-key low
/// bound, then size) and accumulated while the combined row count and byte size
/// stay under the configured caps and each sort range overlaps or touches the
/// span covered so far. A shard already over either cap on its own is left
/// alone.
#[derive(Clone, Debug)]
pub struct CompactionSetCreator {
    max_shard_rows: u64,
    max_shard_size: u64,
    min_shards: usize,
}

impl CompactionSetCreator {
    /// Creator using the caps from `options`.
    pub fn new(options: &OrganizerOptions) -> Self {
        Self {
            max_shard_rows: options.max_shard_rows,
            max_shard_size: options.max_shard_size,
            min_shards: options.min_shards_per_set.max(1),
        }
    }

    /// Organization sets for one group produced by [`super::partition`].
    pub fn create_sets(
        &self,
        table_id: TableId,
        group: &[ShardIndexInfo],
    ) -> Result<Vec<OrganizationSet>, OrganizerError> {
        let mut ordered: Vec<&ShardIndexInfo> = group.iter().collect();
        ordered.sort_by(|lhs, rhs| compare_placement(lhs, rhs));

        let mut sets = Vec::new();
        let mut candidate: Vec<&ShardIndexInfo> = Vec::new();
        let mut rows = 0u64;
        let mut bytes = 0u64;
        let mut span: Option<ShardRange> = None;
        for shard in ordered {
            if self.exceeds(shard.row_count(), shard.uncompressed_size()) {
                continue;
            }
            let next_rows = rows.saturating_add(shard.row_count());
            let next_bytes = bytes.saturating_add(shard.uncompressed_size());
            let disjoint = match (&span, shard.sort_range()) {
                (Some(span), Some(range)) => !span.overlaps(range) && !span.adjacent(range),
                _ => false,
            };
            if !candidate.is_empty() && (disjoint || self.exceeds(next_rows, next_bytes)) {
                self.flush(table_id, &mut candidate, &mut sets)?;
                rows = shard.row_count();
                bytes = shard.uncompressed_size();
                span = shard.sort_range().cloned();
            } else {
                rows = next_rows;
                bytes = next_bytes;
                span = match (span, shard.sort_range()) {
                    (Some(span), Some(range)) => Some(span.span(range)),
                    (None, range) => range.cloned(),
                    (span, None) => span,
                };
            }
            candidate.push(shard);
        }
        self.flush(table_id, &mut candidate, &mut sets)?;
        Ok(sets)
    }

    fn exceeds(&self, rows: u64, bytes: u64) -> bool {
        rows > self.max_shard_rows || bytes > self.max_shard_size
    }

    fn flush(
        &self,
        table_id: TableId,
        candidate: &mut Vec<&ShardIndexInfo>,
        sets: &mut Vec<OrganizationSet>,
    ) -> Result<(), OrganizerError> {
        if candidate.len() >= self.min_shards {
            sets.push(build_organization_set(table_id, candidate.iter().copied())?);
        }
        candidate.clear();
        Ok(())
    }
}

fn compare_placement(lhs: &ShardIndexInfo, rhs: &ShardIndexInfo) -> Ordering {
    low_bound(lhs.temporal_range())
        .cmp(&low_bound(rhs.temporal_range()))
        .then_with(|| low_bound(lhs.sort_range()).cmp(&low_bound(rhs.sort_range())))
        .then_with(|| lhs.uncompressed_size().cmp(&rhs.uncompressed_size()))
}

fn low_bound(range: Option<&ShardRange>) -> Option<&Tuple> {
    range.map(ShardRange::min_tuple)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{ColumnType, ShardMetadata},
        id::ShardUuid,
        stats::StatsValue,
    };

    fn key_range(lo: i64, hi: i64) -> ShardRange {
        let bound = |v| Tuple::new(vec![ColumnType::Bigint], vec![StatsValue::Int(v)]);
        ShardRange::new(bound(lo).expect("tuple"), bound(hi).expect("tuple")).expect("range")
    }

    fn shard(id: u64, rows: u64, size: u64, sort_low: i64) -> ShardIndexInfo {
        ShardIndexInfo::new(
            &ShardMetadata {
                shard_id: id,
                shard_uuid: ShardUuid::from_parts(id, 0),
                table_id: 1,
                bucket_number: Some(0),
                row_count: rows,
                uncompressed_size: size,
            },
            Some(key_range(sort_low, sort_low + 10)),
            None,
        )
    }

    fn members(set: &OrganizationSet) -> Vec<u64> {
        set.shards().iter().map(|uuid| uuid.timestamp_ms()).collect()
    }

    #[test]
    fn accumulates_until_row_cap() {
        let creator = CompactionSetCreator::new(&OrganizerOptions::default().max_shard_rows(100));
        let group = vec![
            shard(1, 40, 1, 30),
            shard(2, 40, 1, 10),
            shard(3, 40, 1, 20),
            shard(4, 40, 1, 40),
        ];
        let sets = creator.create_sets(1, &group).expect("sets");
        let got: Vec<Vec<u64>> = sets.iter().map(members).collect();
        assert_eq!(got, vec![vec![2, 3], vec![1, 4]]);
        assert!(sets.iter().all(|set| set.bucket_number() == Some(0)));
    }

    #[test]
    fn oversized_shards_are_skipped() {
        let creator = CompactionSetCreator::new(&OrganizerOptions::default().max_shard_size(50));
        let group = vec![shard(1, 1, 60, 0), shard(2, 1, 20, 1), shard(3, 1, 20, 2)];
        let sets = creator.create_sets(1, &group).expect("sets");
        let got: Vec<Vec<u64>> = sets.iter().map(members).collect();
        assert_eq!(got, vec![vec![2, 3]]);
    }

    #[test]
    fn lone_leftover_is_not_worth_a_set() {
        let creator = CompactionSetCreator::new(&OrganizerOptions::default().max_shard_rows(50));
        let group = vec![shard(1, 30, 1, 0), shard(2, 30, 1, 1), shard(3, 10, 1, 2)];
        let sets = creator.create_sets(1, &group).expect("sets");
        let got: Vec<Vec<u64>> = sets.iter().map(members).collect();
        assert_eq!(got, vec![vec![2, 3]]);
    }

    #[test]
    fn disjoint_sort_ranges_start_a_new_set() {
        let creator = CompactionSetCreator::new(&OrganizerOptions::default());
        // [0,10] [5,15] [15,25] chain together, [100,110] [105,115] stand apart
        let group = vec![
            shard(4, 10, 1, 100),
            shard(1, 10, 1, 0),
            shard(3, 10, 1, 15),
            shard(2, 10, 1, 5),
            shard(5, 10, 1, 105),
        ];
        let sets = creator.create_sets(1, &group).expect("sets");
        let got: Vec<Vec<u64>> = sets.iter().map(members).collect();
        assert_eq!(got, vec![vec![1, 2, 3], vec![4, 5]]);
    }

    #[test]
    fn shards_without_sort_ranges_only_hit_the_caps() {
        let creator = CompactionSetCreator::new(&OrganizerOptions::default().max_shard_rows(20));
        let bare = |id: u64| {
            ShardIndexInfo::new(
                &ShardMetadata {
                    shard_id: id,
                    shard_uuid: ShardUuid::from_parts(id, 0),
                    table_id: 1,
                    bucket_number: None,
                    row_count: 10,
                    uncompressed_size: id,
                },
                None,
                None,
            )
        };
        let group: Vec<ShardIndexInfo> = (1..=4).map(bare).collect();
        let sets = creator.create_sets(1, &group).expect("sets");
        let got: Vec<Vec<u64>> = sets.iter().map(members).collect();
        assert_eq!(got, vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn empty_group_yields_nothing() {
        let creator = CompactionSetCreator::new(&OrganizerOptions::default());
        assert!(creator.create_sets(1, &[]).expect("sets").is_empty());
    }
}
