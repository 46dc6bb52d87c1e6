//! Projection of a series onto chart coordinates.
//!
//! The price chart draws one bar per record from zero to the close, and overlays the
//! volume rescaled so the busiest day reaches a fifth of the highest price.
use chrono::NaiveDate;
use serde::Serialize;

use crate::record::QuoteRecord;
use crate::stats::StatItems;

/// Fraction of `max_high` the largest volume bar reaches.
const VOLUME_BAR_SHARE: f64 = 5.0;

/// One x position of the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Trading day on the x axis.
    pub date: NaiveDate,
    /// Height of the price bar.
    pub close: f64,
    /// Volume in price units, ready to be drawn on the same axis as `close`.
    pub volume_bar: f64,
}

/// Maps `records` to chart points using the scale taken from `stats`.
pub fn chart_points(records: &[QuoteRecord], stats: &StatItems) -> Vec<ChartPoint> {
    records
        .iter()
        .map(|record| ChartPoint {
            date: record.date,
            close: record.close,
            volume_bar: volume_bar(record.volume, stats),
        })
        .collect()
}

fn volume_bar(volume: f64, stats: &StatItems) -> f64 {
    if stats.max_volume == 0.0 {
        return 0.0;
    }
    volume / stats.max_volume * stats.max_high / VOLUME_BAR_SHARE
}
