//! Funding data sources.
//!
//! This module provides loading of the funding JSON document from a
//! local file or a remote URL.

pub mod loader;

pub use loader::{fetch_document, DataSource, FetchOptions, DEFAULT_LOCATION};
