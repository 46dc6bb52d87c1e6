//! HTTP retrieval of feed bodies.
//!
//! `HttpFetcher` is the production `TextFetcher`: one blocking GET per call, success
//! only on a 2xx status, body decoded as UTF-8. Every failure is returned as a
//! `FeedError` so the caller can report it.
use std::time::Duration;

use lines_common::FeedError;
use lines_common::Result;
use lines_common::source::TextFetcher;
use log::{debug, info};

const USER_AGENT: &str = concat!("lines_client/", env!("CARGO_PKG_VERSION"));

/// Blocking HTTP fetcher backed by `reqwest`.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FeedError::Fetch {
                locator: String::from("<client>"),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl TextFetcher for HttpFetcher {
    fn fetch_text(&self, locator: &str) -> Result<String> {
        info!("Fetching {}", locator);
        let transport = |e: reqwest::Error| FeedError::Fetch {
            locator: locator.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(locator).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::HttpStatus {
                locator: locator.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(transport)?;
        debug!("Received {} bytes from {}", body.len(), locator);
        Ok(String::from_utf8(body.to_vec())?)
    }
}
