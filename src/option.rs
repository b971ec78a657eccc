/// Tunables for a single organization pass.
///
/// The statistics lookup batch size is deliberately absent; it is fixed at
/// [`crate::organizer::LOOKUP_BATCH_SIZE`].
#[derive(Debug, Clone)]
pub struct OrganizerOptions {
    pub(crate) max_shard_rows: u64,
    pub(crate) max_shard_size: u64,
    pub(crate) min_shards_per_set: usize,
    pub(crate) include_sort_columns: bool,
}

impl Default for OrganizerOptions {
    fn default() -> Self {
        OrganizerOptions {
            max_shard_rows: 1_000_000,
            max_shard_size: 256 * 1024 * 1024,
            min_shards_per_set: 2,
            include_sort_columns: true,
        }
    }
}

impl OrganizerOptions {
    /// Upper bound on the combined row count of one organization set.
    pub fn max_shard_rows(self, max_shard_rows: u64) -> Self {
        OrganizerOptions {
            max_shard_rows,
            ..self
        }
    }

    /// Upper bound on the combined uncompressed bytes of one organization set.
    pub fn max_shard_size(self, max_shard_size: u64) -> Self {
        OrganizerOptions {
            max_shard_size,
            ..self
        }
    }

    /// Smallest selection worth rewriting; clamped to at least one shard.
    pub fn min_shards_per_set(self, min_shards_per_set: usize) -> Self {
        OrganizerOptions {
            min_shards_per_set: min_shards_per_set.max(1),
            ..self
        }
    }

    /// Whether sort-column ranges are required for a shard to be eligible.
    pub fn include_sort_columns(self, include_sort_columns: bool) -> Self {
        OrganizerOptions {
            include_sort_columns,
            ..self
        }
    }
}
