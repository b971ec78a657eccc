#![deny(missing_docs)]
//! Shard organization planning for range-indexed columnar tables.
//!
//! Table data lives in immutable shards. A background organization pass
//! periodically rewrites groups of small or overlapping shards into fewer,
//! better laid out ones. This crate decides *which* shards may be grouped:
//!
//! 1. [`organizer::load_eligible_shards`] fetches per-shard min/max statistics
//!    in bounded batches and keeps the shards whose required ranges are
//!    complete.
//! 2. [`organizer::partition`] splits eligible shards into groups that never
//!    cross a hash bucket or a calendar day.
//! 3. [`organizer::build_organization_set`] packages one chosen subset into an
//!    [`organizer::OrganizationSet`], refusing subsets that span buckets.
//!
//! [`organizer::ShardOrganizer`] strings the three together with a size
//! bounded selection step. Catalog and statistics access are injected through
//! [`catalog::TableCatalog`] and [`stats::StatsStore`]; in-memory
//! implementations of both ship with the crate.

mod logging;

/// Table, column, and shard catalog records plus the catalog interface.
pub mod catalog;

/// Crate-wide error type.
pub mod error;

/// Identifier types shared across layers.
pub mod id;

/// Tunables for a planning pass.
pub mod option;

/// Organization planning: loading, partitioning, selection, task building.
pub mod organizer;

/// Typed statistics values, tuples, ranges, and the statistics store interface.
pub mod stats;

pub use crate::{
    error::OrganizerError,
    option::OrganizerOptions,
    organizer::{OrganizationSet, ShardIndexInfo, ShardOrganizer},
};
