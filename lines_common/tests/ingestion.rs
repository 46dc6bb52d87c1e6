//! End-to-end ingestion of quote and directory feeds through a fake fetcher.

use chrono::NaiveDate;
use lines_common::ingest::{load_directory, load_series};
use lines_common::source::{DEFAULT_HOST_BASE, DIRECTORY_SOURCE_ID, locator_for};
use lines_common::{FeedError, NumericPolicy, RangeCode, Result, SeriesKey, aggregate};

const QUOTES: &str = "GOOG.D3M,2023-01-30,90,95,89,93,93,1000000\n\
GOOG.D3M,2023-01-31,93,97,92,96,96,2000000\n\
AAPL.D3M,2023-01-31,1,2,1,1.5,1.5,500000";

const DIRECTORY: &str = concat!(
    "Alphabet,GOOG,https://drive.google.com/file/d/goog-feed/view?usp=share_link\r\n",
    "Apple,AAPL,https://drive.google.com/file/d/aapl-feed/view?usp=share_link\r\n"
);

fn feed_host(locator: &str) -> Result<String> {
    match locator {
        l if l == locator_for(DEFAULT_HOST_BASE, DIRECTORY_SOURCE_ID) => Ok(DIRECTORY.to_string()),
        l if l == locator_for(DEFAULT_HOST_BASE, "goog-feed") => Ok(QUOTES.to_string()),
        other => Err(FeedError::HttpStatus {
            locator: other.to_string(),
            status: 404,
        }),
    }
}

#[test]
fn goog_daily_scenario() {
    let key = SeriesKey::new("GOOG", RangeCode::D3M);
    let series = load_series(
        &feed_host,
        &locator_for(DEFAULT_HOST_BASE, "goog-feed"),
        &key,
        NumericPolicy::Lenient,
    )
    .unwrap();

    assert_eq!(series.records.len(), 2);
    assert_eq!(series.rejected, 0);
    let stats = &series.stats;
    assert_eq!(stats.count, 2);
    assert_eq!(stats.min_low, 89.0);
    assert_eq!(stats.max_high, 97.0);
    assert_eq!(stats.avg_close, 94.5);
    assert_eq!(stats.last_close, 96.0);
    assert_eq!(stats.max_volume, 2.0);
    assert_eq!(stats.last_day, "31-Jan-2023");
    assert_eq!(stats.last_date, NaiveDate::from_ymd_opt(2023, 1, 31));
}

#[test]
fn quarterly_series_absent_from_feed_is_empty() {
    let series = load_series(
        &feed_host,
        &locator_for(DEFAULT_HOST_BASE, "goog-feed"),
        &SeriesKey::new("GOOG", RangeCode::Q),
        NumericPolicy::Lenient,
    )
    .unwrap();
    assert!(series.records.is_empty());
    assert!(series.stats.is_empty());
    assert_eq!(series.stats.last_day, "");
}

#[test]
fn directory_then_series() {
    let entries =
        load_directory(&feed_host, &locator_for(DEFAULT_HOST_BASE, DIRECTORY_SOURCE_ID)).unwrap();
    assert_eq!(entries.len(), 2);

    let apple = entries.iter().find(|e| e.ticker == "AAPL").unwrap();
    assert_eq!(apple.company, "Apple");
    // The Apple feed is not hosted: the failure must reach the caller.
    let err = load_series(
        &feed_host,
        &locator_for(DEFAULT_HOST_BASE, &apple.source_id),
        &SeriesKey::new(&apple.ticker, RangeCode::D3M),
        NumericPolicy::Lenient,
    )
    .unwrap_err();
    assert!(matches!(err, FeedError::HttpStatus { status: 404, .. }));
}

#[test]
fn aggregate_is_idempotent() {
    let records: Vec<_> = QUOTES.lines().filter_map(|l| l.parse().ok()).collect();
    let key = SeriesKey::from_raw("GOOG.D3M");
    let first = aggregate(&records, &key);
    let second = aggregate(&records, &key);
    assert_eq!(first, second);
    assert_eq!(first.avg_close.to_bits(), second.avg_close.to_bits());
}
