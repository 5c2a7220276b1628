//! Offline cache worker.
//!
//! A service-worker-style background component: precaches a fixed asset
//! list under a named cache version at install, purges stale versions at
//! activation, and routes intercepted requests between network-first and
//! cache-first policies.

pub mod offline;

pub use offline::{OfflineWorker, WorkerState, ASSETS_TO_CACHE, CACHE_NAME};
