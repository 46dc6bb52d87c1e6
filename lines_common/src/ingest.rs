//! Bulk ingestion of fetched feeds.
//!
//! A feed body is split on `\n` and every line goes through the matching record
//! parser. Rejected lines are skipped and logged; one bad line never aborts the batch.
//! Fetch failures, on the other hand, are per request and are returned to the caller.
use log::{debug, info};
use serde::Serialize;

use crate::record::{DirectoryEntry, NumericPolicy, QuoteRecord};
use crate::result::Result;
use crate::series::SeriesKey;
use crate::source::TextFetcher;
use crate::stats::{StatItems, StatsAccumulator};

/// Accepted records of one series together with their statistics.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteSeries {
    /// Series that was requested.
    pub key: SeriesKey,
    /// Records of `key` in feed order.
    pub records: Vec<QuoteRecord>,
    /// Statistics over `records`.
    pub stats: StatItems,
    /// Number of non-blank lines the parser rejected.
    pub rejected: usize,
}

/// Parses every directory line of `text`, keeping feed order.
pub fn ingest_directory(text: &str) -> Vec<DirectoryEntry> {
    let mut entries = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        if is_blank(line) {
            continue;
        }
        match line.parse::<DirectoryEntry>() {
            Ok(entry) => entries.push(entry),
            Err(e) => debug!("Skipping directory line {}: {}", index + 1, e),
        }
    }
    entries
}

/// Parses the quote lines of `text` and aggregates those belonging to `key`.
pub fn ingest_quotes(text: &str, key: &SeriesKey, policy: NumericPolicy) -> QuoteSeries {
    let mut acc = StatsAccumulator::new(key.clone());
    let mut records = Vec::new();
    let mut rejected = 0;

    for (index, line) in text.split('\n').enumerate() {
        if is_blank(line) {
            continue;
        }
        match QuoteRecord::parse_with(line, policy) {
            Ok(record) => {
                if acc.push(&record) {
                    records.push(record);
                }
            }
            Err(e) => {
                rejected += 1;
                debug!("Skipping quote line {}: {}", index + 1, e);
            }
        }
    }

    QuoteSeries {
        key: key.clone(),
        records,
        stats: acc.finish(),
        rejected,
    }
}

/// Fetches the directory feed at `locator` and parses it.
pub fn load_directory<F>(fetcher: &F, locator: &str) -> Result<Vec<DirectoryEntry>>
where
    F: TextFetcher + ?Sized,
{
    let text = fetcher.fetch_text(locator)?;
    let entries = ingest_directory(&text);
    info!("Loaded {} directory entries from {}", entries.len(), locator);
    Ok(entries)
}

/// Fetches the quote feed at `locator` and ingests the series `key`.
pub fn load_series<F>(
    fetcher: &F,
    locator: &str,
    key: &SeriesKey,
    policy: NumericPolicy,
) -> Result<QuoteSeries>
where
    F: TextFetcher + ?Sized,
{
    let text = fetcher.fetch_text(locator)?;
    let series = ingest_quotes(&text, key, policy);
    info!(
        "Loaded {} records for {} from {} ({} rejected lines)",
        series.records.len(),
        key,
        locator,
        series.rejected
    );
    Ok(series)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
