use serde::{Deserialize, Serialize};

use crate::{
    catalog::ShardMetadata,
    id::{BucketNumber, ShardUuid, TableId},
    stats::ShardRange,
};

/// Per-shard planning record: catalog facts plus decoded statistics ranges.
///
/// Built fresh for every planning pass and never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardIndexInfo {
    table_id: TableId,
    bucket_number: Option<BucketNumber>,
    shard_uuid: ShardUuid,
    row_count: u64,
    uncompressed_size: u64,
    sort_range: Option<ShardRange>,
    temporal_range: Option<ShardRange>,
}

impl ShardIndexInfo {
    /// Combine catalog metadata with the ranges decoded for the shard.
    pub fn new(
        metadata: &ShardMetadata,
        sort_range: Option<ShardRange>,
        temporal_range: Option<ShardRange>,
    ) -> Self {
        Self {
            table_id: metadata.table_id,
            bucket_number: metadata.bucket_number,
            shard_uuid: metadata.shard_uuid,
            row_count: metadata.row_count,
            uncompressed_size: metadata.uncompressed_size,
            sort_range,
            temporal_range,
        }
    }

    /// Owning table.
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Bucket of the shard, for bucketed tables.
    pub fn bucket_number(&self) -> Option<BucketNumber> {
        self.bucket_number
    }

    /// Global shard identity.
    pub fn shard_uuid(&self) -> ShardUuid {
        self.shard_uuid
    }

    /// Rows stored in the shard.
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Uncompressed byte size.
    pub fn uncompressed_size(&self) -> u64 {
        self.uncompressed_size
    }

    /// Range of the sort key, when sort statistics were loaded.
    pub fn sort_range(&self) -> Option<&ShardRange> {
        self.sort_range.as_ref()
    }

    /// Range of the temporal column, for time-partitioned tables.
    pub fn temporal_range(&self) -> Option<&ShardRange> {
        self.temporal_range.as_ref()
    }
}
