//! Versioned asset cache for offline access.
//!
//! This module provides `CacheStorage`, a directory of named cache
//! versions, and `Cache`, one snapshot of captured responses keyed by
//! request URL. The offline worker populates a version at install and
//! purges stale versions at activation.

pub mod store;

pub use store::{Cache, CacheStorage};
