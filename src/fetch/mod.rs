//! HTTP fetch layer for the offline cache worker.
//!
//! This module provides the `Fetcher` trait and its reqwest-backed
//! `HttpFetcher` implementation. The worker's routing policy talks to the
//! network exclusively through this seam.

pub mod client;
pub mod error;

pub use client::{FetchRequest, FetchedResponse, Fetcher, HttpFetcher};
pub use error::FetchError;
