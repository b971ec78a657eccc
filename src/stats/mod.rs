//! Per-shard column statistics: typed values, tuples, ranges, and the store
//! they are read from.

mod memory;
mod range;
mod store;
mod tuple;
mod value;

pub use memory::{LookupRecord, MemoryStatsSession, MemoryStatsStore};
pub use range::ShardRange;
pub use store::{ColumnStats, StatsColumn, StatsRow, StatsSession, StatsStore, StoreError};
pub use tuple::Tuple;
pub use value::{RawStat, StatsEncoding, StatsValue};
