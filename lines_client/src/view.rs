//! Text and JSON rendering of directory listings and series summaries.
use lines_common::chart::{ChartPoint, chart_points};
use lines_common::ingest::QuoteSeries;
use lines_common::{DirectoryEntry, RangeCode, Result, StatItems};
use serde::Serialize;

/// Everything shown for one ticker and range.
#[derive(Debug, Serialize)]
pub struct SeriesView<'a> {
    /// Company name, when the ticker was resolved through the directory.
    pub company: Option<&'a str>,
    /// Ticker symbol as shown to the user.
    pub ticker: &'a str,
    /// Range the statistics were computed for.
    pub range: RangeCode,
    /// Aggregated statistics of the series.
    pub stats: &'a StatItems,
    /// Chart points, present only when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<ChartPoint>>,
}

impl<'a> SeriesView<'a> {
    /// Builds the view of `series`; chart points are projected only if `with_points`.
    pub fn new(
        company: Option<&'a str>,
        ticker: &'a str,
        range: RangeCode,
        series: &'a QuoteSeries,
        with_points: bool,
    ) -> Self {
        Self {
            company,
            ticker,
            range,
            stats: &series.stats,
            points: with_points.then(|| chart_points(&series.records, &series.stats)),
        }
    }

    /// Header block followed by one row per chart point.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if let Some(company) = self.company {
            out.push_str(company);
            out.push('\n');
        }
        out.push_str(&format!("{} ({})\n", self.ticker, self.range.label()));
        if self.stats.is_empty() {
            out.push_str("No quotes for this range.");
        } else {
            out.push_str(&self.stats.to_string());
        }
        if let Some(points) = &self.points {
            for point in points {
                out.push_str(&format!(
                    "\n{}  close {:>10.2}  volume {:>10.2}",
                    point.date, point.close, point.volume_bar
                ));
            }
        }
        out
    }
}

/// One line per company: name, ticker and feed id.
pub fn companies_text(entries: &[DirectoryEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{:<32} {:<8} {}", e.company, e.ticker, e.source_id))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty JSON for any serializable view.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
