use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ShardIndexInfo;
use crate::{
    error::OrganizerError,
    id::{BucketNumber, ShardUuid, TableId},
};

/// One rewrite task: shards of a single bucket to be merged together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSet {
    table_id: TableId,
    shards: BTreeSet<ShardUuid>,
    bucket_number: Option<BucketNumber>,
}

impl OrganizationSet {
    /// Table the shards belong to.
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Shards to merge.
    pub fn shards(&self) -> &BTreeSet<ShardUuid> {
        &self.shards
    }

    /// Bucket shared by every member, `None` for unbucketed tables.
    pub fn bucket_number(&self) -> Option<BucketNumber> {
        self.bucket_number
    }
}

/// Package shards chosen from one partition group into an [`OrganizationSet`].
///
/// Fails when the shards carry zero or several distinct bucket numbers, which
/// means the caller mixed partition groups or passed nothing at all.
pub fn build_organization_set<'a>(
    table_id: TableId,
    shards: impl IntoIterator<Item = &'a ShardIndexInfo>,
) -> Result<OrganizationSet, OrganizerError> {
    let mut uuids = BTreeSet::new();
    let mut buckets = BTreeSet::new();
    for shard in shards {
        uuids.insert(shard.shard_uuid());
        buckets.insert(shard.bucket_number());
    }
    match buckets.len() {
        1 => {
            let bucket_number = buckets.into_iter().next().flatten();
            Ok(OrganizationSet {
                table_id,
                shards: uuids,
                bucket_number,
            })
        }
        _ => Err(OrganizerError::BucketInvariant {
            table_id,
            buckets: buckets.into_iter().collect(),
        }),
    }
}
