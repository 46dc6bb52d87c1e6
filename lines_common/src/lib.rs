//!
//! Common types and utilities for the stock lines feeds.
//!
//! This crate aggregates:
//! - `error` — unified error type `FeedError` used across the workspace.
//! - `result` — handy `Result<T, FeedError>` alias.
//! - `series` — range codes and `<TICKER>.<RANGE_CODE>` series keys.
//! - `record` — line parsers for directory entries and quote records.
//! - `stats` — single-pass aggregation of a series into `StatItems`.
//! - `chart` — projection of a series onto chart coordinates.
//! - `source` — feed locators and the `TextFetcher` collaborator.
//! - `ingest` — bulk ingestion of fetched feeds.
#![warn(missing_docs)]
pub mod error;
pub mod result;
pub mod series;
pub mod record;
pub mod stats;
pub mod chart;
pub mod source;
pub mod ingest;

pub use error::FeedError;
pub use result::Result;
pub use record::{DirectoryEntry, NumericPolicy, QuoteRecord};
pub use series::{RangeCode, SeriesKey};
pub use stats::{StatItems, aggregate};
