use std::sync::Mutex;

use ulid::{Generator, Ulid};

/// Catalog identifier of a logical table.
pub type TableId = u64;

/// Catalog identifier of a column within its table.
pub type ColumnId = u64;

/// Catalog-local identifier of a shard; used to key statistics lookups.
pub type ShardId = u64;

/// Global identity of a shard, carried into organization sets.
pub type ShardUuid = Ulid;

/// Hash bucket a shard of a bucketed table is routed to.
pub type BucketNumber = u32;

/// Thread-safe ULID generator for shard identities.
pub struct ShardUuidGenerator {
    inner: Mutex<Generator>,
}

impl ShardUuidGenerator {
    /// Create a new generator seeded with the current time.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Generator::new()),
        }
    }

    /// Produce the next [`ShardUuid`] in a monotonic, time-ordered sequence.
    pub fn generate(&self) -> ShardUuid {
        let mut guard = self
            .inner
            .lock()
            .expect("shard uuid generator mutex should not be poisoned");
        guard
            .generate()
            .expect("shard uuid generator should advance without error")
    }
}

impl Default for ShardUuidGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_uuids_are_monotonic() {
        let generator = ShardUuidGenerator::new();
        let first = generator.generate();
        let second = generator.generate();
        assert!(first < second);
    }
}
