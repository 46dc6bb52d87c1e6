//! Remote feed locations and the fetch collaborator.

use crate::result::Result;

/// Download prefix of the file host; the source id is appended to it.
pub const DEFAULT_HOST_BASE: &str = "https://drive.google.com/uc?id=";
/// Source id of the directory feed listing every company.
pub const DIRECTORY_SOURCE_ID: &str = "1M-A9bL1EmTjJTM1g6C7v0NS0mIJPk40h";

/// Helper to build a fetchable locator like "https://host/uc?id=<id>".
pub fn locator_for(host_base: &str, source_id: &str) -> String {
    format!("{}{}", host_base, source_id)
}

/// Retrieves the full text body behind a locator.
///
/// Implementations perform one GET per call. Transport failures, non-success statuses
/// and undecodable bodies must come back as `Err`, never as an empty body.
pub trait TextFetcher: Send + Sync {
    /// Fetches `locator` and returns the body decoded as UTF-8.
    fn fetch_text(&self, locator: &str) -> Result<String>;
}

impl<F> TextFetcher for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn fetch_text(&self, locator: &str) -> Result<String> {
        self(locator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locator_appends_source_id() {
        assert_eq!(
            locator_for(DEFAULT_HOST_BASE, DIRECTORY_SOURCE_ID),
            "https://drive.google.com/uc?id=1M-A9bL1EmTjJTM1g6C7v0NS0mIJPk40h"
        );
    }

    #[test]
    fn closures_are_fetchers() {
        let fetcher = |locator: &str| -> Result<String> { Ok(format!("body of {locator}")) };
        assert_eq!(fetcher.fetch_text("x").unwrap(), "body of x");
    }
}
