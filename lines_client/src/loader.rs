//! Background loading of quote series for an interactive view.
//!
//! Each `request` fetches and ingests one series on its own thread and reports a
//! `LoadOutcome` over a channel. Requests are numbered; a new request supersedes every
//! older one for the same view:
//! - the previous request's cancel flag is raised, so it skips ingestion and does not
//!   report at all if its fetch is still running;
//! - an outcome that still arrives with an old generation is discarded by `accept`.
//!
//! A slow stale response can therefore never overwrite a newer one.
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;

use crossbeam_channel::{Receiver, Sender, unbounded};
use lines_common::ingest::{QuoteSeries, ingest_quotes};
use lines_common::source::TextFetcher;
use lines_common::{NumericPolicy, RangeCode, Result, SeriesKey};
use log::{debug, error, info};

/// Result of one load, tagged with the request that produced it.
#[derive(Debug)]
pub struct LoadOutcome {
    /// Sequence number of the request.
    pub generation: u64,
    /// Range that was requested.
    pub range: RangeCode,
    /// Ingested series, or the fetch failure.
    pub result: Result<QuoteSeries>,
}

/// Issues loads of one ticker's quote feed and filters out stale results.
pub struct SeriesLoader {
    fetcher: Arc<dyn TextFetcher>,
    locator: String,
    ticker: String,
    policy: NumericPolicy,
    latest: u64,
    pending: bool,
    in_flight: Option<Arc<AtomicBool>>,
    tx: Sender<LoadOutcome>,
    rx: Receiver<LoadOutcome>,
}

impl SeriesLoader {
    /// Creates a loader for the feed at `locator` belonging to `ticker`.
    pub fn new(
        fetcher: Arc<dyn TextFetcher>,
        locator: String,
        ticker: String,
        policy: NumericPolicy,
    ) -> Self {
        let (tx, rx) = unbounded();
        Self {
            fetcher,
            locator,
            ticker,
            policy,
            latest: 0,
            pending: false,
            in_flight: None,
            tx,
            rx,
        }
    }

    /// Starts loading `range`, superseding any earlier request. Returns its generation.
    pub fn request(&mut self, range: RangeCode) -> u64 {
        if let Some(cancel) = self.in_flight.take() {
            cancel.store(true, Ordering::SeqCst);
            debug!("Load {} superseded", self.latest);
        }

        self.latest += 1;
        self.pending = true;
        let generation = self.latest;
        let cancel = Arc::new(AtomicBool::new(false));
        self.in_flight = Some(Arc::clone(&cancel));

        let fetcher = Arc::clone(&self.fetcher);
        let locator = self.locator.clone();
        let key = SeriesKey::new(&self.ticker, range);
        let policy = self.policy;
        let tx = self.tx.clone();

        info!("Load {} started: {} ({})", generation, key, range.label());
        thread::spawn(move || {
            let fetched = fetcher.fetch_text(&locator);
            if cancel.load(Ordering::SeqCst) {
                debug!("Load {} cancelled, dropping response", generation);
                return;
            }
            let result = fetched.map(|text| ingest_quotes(&text, &key, policy));
            if let Err(e) = tx.send(LoadOutcome {
                generation,
                range,
                result,
            }) {
                error!("Load {} could not be delivered: {}", generation, e);
            }
        });
        generation
    }

    /// Channel on which outcomes arrive.
    pub fn receiver(&self) -> &Receiver<LoadOutcome> {
        &self.rx
    }

    /// Returns `true` while the most recent request has not been accepted.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Keeps `outcome` only if it answers the most recent request.
    pub fn accept(&mut self, outcome: LoadOutcome) -> Option<LoadOutcome> {
        if outcome.generation != self.latest {
            debug!(
                "Discarding stale load {} (latest is {})",
                outcome.generation, self.latest
            );
            return None;
        }
        self.pending = false;
        self.in_flight = None;
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lines_common::FeedError;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    const FEED: &str = "GOOG.D3M,2023-01-30,90,95,89,93,93,1000000\n\
GOOG.Q,2022-12-30,80,99,70,90,90,3000000\n";

    fn loader(fetcher: Arc<dyn TextFetcher>) -> SeriesLoader {
        SeriesLoader::new(
            fetcher,
            String::from("http://feed"),
            String::from("GOOG"),
            NumericPolicy::Lenient,
        )
    }

    #[test]
    fn single_request_is_delivered() {
        let fetcher: Arc<dyn TextFetcher> =
            Arc::new(|_: &str| -> Result<String> { Ok(FEED.to_string()) });
        let mut loader = loader(fetcher);
        let generation = loader.request(RangeCode::Q);

        let outcome = loader.receiver().recv_timeout(Duration::from_secs(5)).unwrap();
        let outcome = loader.accept(outcome).unwrap();
        assert_eq!(outcome.generation, generation);
        assert_eq!(outcome.range, RangeCode::Q);
        let series = outcome.result.unwrap();
        assert_eq!(series.key.as_str(), "GOOG.Q");
        assert_eq!(series.stats.max_high, 99.0);
        assert!(!loader.is_pending());
    }

    #[test]
    fn slow_stale_response_never_reaches_the_view() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (entered_tx, entered_rx) = unbounded::<()>();
        let (gate_tx, gate_rx) = unbounded::<()>();
        let fetcher: Arc<dyn TextFetcher> = {
            let calls = Arc::clone(&calls);
            Arc::new(move |_: &str| -> Result<String> {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    let _ = entered_tx.send(());
                    let _ = gate_rx.recv();
                }
                Ok(FEED.to_string())
            })
        };
        let mut loader = loader(fetcher);

        let first = loader.request(RangeCode::D3M);
        entered_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let second = loader.request(RangeCode::Q);
        assert!(second > first);

        let outcome = loader.receiver().recv_timeout(Duration::from_secs(5)).unwrap();
        let outcome = loader.accept(outcome).unwrap();
        assert_eq!(outcome.generation, second);
        assert_eq!(outcome.range, RangeCode::Q);

        gate_tx.send(()).unwrap();
        assert!(loader.receiver().recv_timeout(Duration::from_millis(300)).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn outcomes_of_old_generations_are_discarded() {
        let fetcher: Arc<dyn TextFetcher> =
            Arc::new(|_: &str| -> Result<String> { Ok(String::new()) });
        let mut loader = loader(fetcher);
        loader.request(RangeCode::D3M);
        loader.request(RangeCode::Q);

        let stale = LoadOutcome {
            generation: 1,
            range: RangeCode::D3M,
            result: Err(FeedError::ChannelRecv(String::from("test"))),
        };
        assert!(loader.accept(stale).is_none());
        assert!(loader.is_pending());
    }

    #[test]
    fn fetch_failures_are_reported() {
        let fetcher: Arc<dyn TextFetcher> = Arc::new(|locator: &str| -> Result<String> {
            Err(FeedError::Fetch {
                locator: locator.to_string(),
                reason: String::from("connection reset"),
            })
        });
        let mut loader = loader(fetcher);
        loader.request(RangeCode::D3M);

        let outcome = loader.receiver().recv_timeout(Duration::from_secs(5)).unwrap();
        let outcome = loader.accept(outcome).unwrap();
        assert!(matches!(outcome.result, Err(FeedError::Fetch { .. })));
    }
}
