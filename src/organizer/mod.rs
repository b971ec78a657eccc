//! Organization planning on top of catalog metadata and shard statistics.
//!
//! The pipeline for one table is: [`load_eligible_shards`] →
//! [`partition`] → [`CompactionSetCreator`] → [`build_organization_set`].
//! [`ShardOrganizer`] runs all of it; the stages are also exposed so callers can
//! plug in their own selection heuristic between partitioning and building.

/// Planning record per shard.
mod index;
/// Batched statistics loading.
mod loader;
/// Bucket/day partitioning.
mod partition;
/// Per-table planner facade.
mod planner;
/// Size-bounded set selection.
mod selector;
/// Organization set construction.
mod set;
/// Calendar-day derivation for temporal ranges.
mod temporal;

pub use index::ShardIndexInfo;
pub use loader::{load_eligible_shards, LOOKUP_BATCH_SIZE};
pub use partition::{partition, PartitionRegime};
pub use planner::ShardOrganizer;
pub use selector::CompactionSetCreator;
pub use set::{build_organization_set, OrganizationSet};
pub use temporal::{CalendarDay, DayFunction};
