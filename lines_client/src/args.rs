//! Command-line arguments for the Lines client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::{Parser, Subcommand};
use lines_common::NumericPolicy;
use lines_common::RangeCode;
use lines_common::source::{DEFAULT_HOST_BASE, DIRECTORY_SOURCE_ID, locator_for};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Download prefix of the file host; a source id is appended to it.
    #[clap(long, default_value = DEFAULT_HOST_BASE)]
    pub host_base: String,

    /// Source id of the company directory feed.
    #[clap(long, default_value = DIRECTORY_SOURCE_ID)]
    pub directory_id: String,

    /// Timeout for a single fetch, in seconds.
    #[clap(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Reject quote rows with malformed numbers instead of reading them as 0.0.
    #[clap(long)]
    pub strict_numbers: bool,

    /// Print JSON instead of text.
    #[clap(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// What to show.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the companies of the directory feed.
    Companies,

    /// Print the statistics of one ticker and range.
    Quote {
        /// Ticker as listed in the directory (e.g. GOOG).
        ticker: String,

        /// Reporting range.
        #[clap(long, value_enum, default_value_t = RangeCode::D3M)]
        range: RangeCode,

        /// Quote feed id; skips the directory lookup.
        #[clap(long)]
        source_id: Option<String>,

        /// Also print one chart row per record.
        #[clap(long)]
        points: bool,
    },

    /// Load a ticker and switch ranges interactively (`d3m`, `q`, `quit` on stdin).
    Browse {
        /// Ticker as listed in the directory (e.g. GOOG).
        ticker: String,

        /// Quote feed id; skips the directory lookup.
        #[clap(long)]
        source_id: Option<String>,
    },
}

impl Args {
    /// Numeric policy selected by `--strict-numbers`.
    pub fn numeric_policy(&self) -> NumericPolicy {
        if self.strict_numbers {
            NumericPolicy::Strict
        } else {
            NumericPolicy::Lenient
        }
    }

    /// Locator of the directory feed.
    pub fn directory_locator(&self) -> String {
        locator_for(&self.host_base, &self.directory_id)
    }

    /// Locator of a quote feed.
    pub fn feed_locator(&self, source_id: &str) -> String {
        locator_for(&self.host_base, source_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_public_directory() {
        let args = Args::parse_from(["lines_client", "companies"]);
        assert_eq!(
            args.directory_locator(),
            "https://drive.google.com/uc?id=1M-A9bL1EmTjJTM1g6C7v0NS0mIJPk40h"
        );
        assert_eq!(args.numeric_policy(), NumericPolicy::Lenient);
        assert_eq!(args.timeout_secs, 30);
    }

    #[test]
    fn quote_accepts_range_and_source() {
        let args = Args::parse_from([
            "lines_client",
            "--strict-numbers",
            "quote",
            "GOOG",
            "--range",
            "q",
            "--source-id",
            "abc",
        ]);
        assert_eq!(args.numeric_policy(), NumericPolicy::Strict);
        match args.command {
            Command::Quote {
                ticker,
                range,
                source_id,
                points,
            } => {
                assert_eq!(ticker, "GOOG");
                assert_eq!(range, RangeCode::Q);
                assert_eq!(source_id.as_deref(), Some("abc"));
                assert!(!points);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_range_is_rejected() {
        let parsed = Args::try_parse_from(["lines_client", "quote", "GOOG", "--range", "weekly"]);
        assert!(parsed.is_err());
    }
}
