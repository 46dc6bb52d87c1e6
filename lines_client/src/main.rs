//! Lines Client — downloads the company directory and per-company quote feeds from the
//! file host, and prints the companies or a summary of one ticker's price series.
//!
//! Usage example (CLI):
//! ```bash
//! lines_client companies
//! lines_client quote GOOG --range q --points
//! lines_client browse GOOG
//! ```
//!
//! `browse` keeps a session open: type `d3m` or `q` to switch range and `quit` to leave.
//! Every switch issues a new load; an older load still in flight is superseded and its
//! response is never shown. See `loader` for details.
#![warn(missing_docs)]
mod args;
mod fetcher;
mod loader;
mod view;

use crate::args::{Args, Command};
use crate::fetcher::HttpFetcher;
use crate::loader::SeriesLoader;
use crate::view::{SeriesView, companies_text, to_json};
use clap::Parser;
use crossbeam_channel::{Receiver, never, select, unbounded};
use lines_common::FeedError;
use lines_common::Result;
use lines_common::ingest::{load_directory, load_series};
use lines_common::source::TextFetcher;
use lines_common::{DirectoryEntry, RangeCode, SeriesKey};
use log::{debug, error, info, warn};
use std::io::BufRead;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::Duration;

/// How often the browse loop checks the shutdown flag.
const TICK_MS: u64 = 200;

/// A feed resolved from the directory or given on the command line.
struct Feed {
    company: Option<String>,
    ticker: String,
    locator: String,
}

/// Input accepted by the browse session.
#[derive(Debug, PartialEq)]
enum BrowseCommand {
    Range(RangeCode),
    Quit,
}

fn parse_browse_command(line: &str) -> Option<BrowseCommand> {
    let word = line.trim();
    if word.eq_ignore_ascii_case("quit") || word.eq_ignore_ascii_case("exit") {
        return Some(BrowseCommand::Quit);
    }
    word.parse::<RangeCode>().ok().map(BrowseCommand::Range)
}

fn main() -> Result<(), FeedError> {
    init_logger();
    let args = Args::parse();
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down client...");
            shutdown.store(true, Ordering::SeqCst);
        }) {
            warn!("Could not install Ctrl+C handler: {}", e);
        }
    }

    let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(args.timeout_secs))?);
    let result = run(&args, fetcher, shutdown);
    if let Err(e) = &result {
        error!("{}", e);
    }
    result
}

fn run(args: &Args, fetcher: Arc<HttpFetcher>, shutdown: Arc<AtomicBool>) -> Result<()> {
    match &args.command {
        Command::Companies => {
            let entries = load_directory(fetcher.as_ref(), &args.directory_locator())?;
            if args.json {
                println!("{}", to_json(&entries)?);
            } else {
                println!("{}", companies_text(&entries));
            }
            Ok(())
        }
        Command::Quote {
            ticker,
            range,
            source_id,
            points,
        } => {
            let feed = resolve_feed(args, fetcher.as_ref(), ticker, source_id.as_deref())?;
            let key = SeriesKey::new(&feed.ticker, *range);
            let policy = args.numeric_policy();
            let series = load_series(fetcher.as_ref(), &feed.locator, &key, policy)?;
            let company = feed.company.as_deref();
            let view = SeriesView::new(company, &feed.ticker, *range, &series, *points);
            print_view(args, &view)
        }
        Command::Browse { ticker, source_id } => {
            let feed = resolve_feed(args, fetcher.as_ref(), ticker, source_id.as_deref())?;
            browse(args, fetcher, feed, shutdown)
        }
    }
}

/// Finds the quote feed of `ticker`, consulting the directory unless `source_id` is given.
fn resolve_feed<F: TextFetcher + ?Sized>(
    args: &Args,
    fetcher: &F,
    ticker: &str,
    source_id: Option<&str>,
) -> Result<Feed> {
    if let Some(id) = source_id {
        return Ok(Feed {
            company: None,
            ticker: ticker.to_string(),
            locator: args.feed_locator(id),
        });
    }

    let entries = load_directory(fetcher, &args.directory_locator())?;
    let entry = find_entry(&entries, ticker)
        .ok_or_else(|| FeedError::TickerNotFound(ticker.to_string()))?;
    debug!("Resolved {} to feed {}", ticker, entry.source_id);
    Ok(Feed {
        company: Some(entry.company.clone()),
        ticker: entry.ticker.clone(),
        locator: args.feed_locator(&entry.source_id),
    })
}

fn find_entry<'a>(entries: &'a [DirectoryEntry], ticker: &str) -> Option<&'a DirectoryEntry> {
    entries
        .iter()
        .find(|e| e.ticker.eq_ignore_ascii_case(ticker.trim()))
}

fn print_view(args: &Args, view: &SeriesView<'_>) -> Result<()> {
    if args.json {
        println!("{}", to_json(view)?);
    } else {
        println!("{}", view.to_text());
    }
    Ok(())
}

/// Runs the interactive session until `quit`, end of input or Ctrl+C.
fn browse(
    args: &Args,
    fetcher: Arc<HttpFetcher>,
    feed: Feed,
    shutdown: Arc<AtomicBool>,
) -> Result<()> {
    let mut loader = SeriesLoader::new(
        fetcher,
        feed.locator.clone(),
        feed.ticker.clone(),
        args.numeric_policy(),
    );
    let outcomes = loader.receiver().clone();
    let input = spawn_stdin_reader();
    let closed: Receiver<String> = never();
    let mut input_open = true;

    loader.request(RangeCode::default());
    info!("Commands: d3m, q, quit");

    while !shutdown.load(Ordering::Relaxed) {
        let lines = if input_open { &input } else { &closed };
        select! {
            recv(lines) -> msg => match msg {
                Ok(line) => match parse_browse_command(&line) {
                    Some(BrowseCommand::Range(range)) => {
                        loader.request(range);
                    }
                    Some(BrowseCommand::Quit) => break,
                    None if line.trim().is_empty() => {}
                    None => warn!("Unknown command: {:?}", line.trim()),
                },
                Err(_) => {
                    debug!("Input closed");
                    input_open = false;
                    if !loader.is_pending() {
                        break;
                    }
                }
            },
            recv(outcomes) -> msg => {
                let outcome = msg.map_err(|e| FeedError::ChannelRecv(e.to_string()))?;
                if let Some(outcome) = loader.accept(outcome) {
                    match outcome.result {
                        Ok(series) => {
                            let view = SeriesView::new(
                                feed.company.as_deref(),
                                &feed.ticker,
                                outcome.range,
                                &series,
                                false,
                            );
                            print_view(args, &view)?;
                        }
                        Err(e) => error!("Load failed: {}", e),
                    }
                    if !input_open {
                        break;
                    }
                }
            },
            default(Duration::from_millis(TICK_MS)) => {}
        }
    }
    info!("Browse session stopping...");
    Ok(())
}

/// Forwards stdin lines to a channel; the channel closes at end of input.
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = unbounded();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECTORY: &str = "Alphabet,GOOG,https://drive.google.com/file/d/goog-feed/view\n\
Apple,AAPL,https://drive.google.com/file/d/aapl-feed/view\n";

    fn directory_host(_: &str) -> Result<String> {
        Ok(DIRECTORY.to_string())
    }

    #[test]
    fn browse_commands() {
        assert_eq!(parse_browse_command(" q "), Some(BrowseCommand::Range(RangeCode::Q)));
        assert_eq!(parse_browse_command("D3M"), Some(BrowseCommand::Range(RangeCode::D3M)));
        assert_eq!(parse_browse_command("quit"), Some(BrowseCommand::Quit));
        assert_eq!(parse_browse_command("weekly"), None);
    }

    #[test]
    fn ticker_is_resolved_through_the_directory() {
        let args = Args::parse_from(["lines_client", "quote", "aapl"]);
        let feed = resolve_feed(&args, &directory_host, "aapl", None).unwrap();
        assert_eq!(feed.company.as_deref(), Some("Apple"));
        assert_eq!(feed.ticker, "AAPL");
        assert_eq!(feed.locator, "https://drive.google.com/uc?id=aapl-feed");
    }

    #[test]
    fn explicit_source_id_skips_the_directory() {
        let args = Args::parse_from(["lines_client", "quote", "GOOG", "--source-id", "xyz"]);
        let offline = |_: &str| -> Result<String> { panic!("directory must not be fetched") };
        let feed = resolve_feed(&args, &offline, "GOOG", Some("xyz")).unwrap();
        assert!(feed.company.is_none());
        assert_eq!(feed.locator, "https://drive.google.com/uc?id=xyz");
    }

    #[test]
    fn unknown_ticker_is_reported() {
        let args = Args::parse_from(["lines_client", "quote", "MSFT"]);
        let err = resolve_feed(&args, &directory_host, "MSFT", None).err().unwrap();
        assert!(matches!(err, FeedError::TickerNotFound(t) if t == "MSFT"));
    }
}
