use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use std::thread;
use std::time::Duration;

const DEFAULT_RETRIES: u32 = 3;
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(2);

pub struct Fetcher {
    client: Client,
    max_retries: u32,
    base_delay: Duration,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        Self::with_retries(DEFAULT_RETRIES, DEFAULT_BASE_DELAY)
    }

    pub fn with_retries(max_retries: u32, base_delay: Duration) -> Result<Self> {
        // Static browser-like headers; both boards serve plain HTML to these.
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
            ),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9,fr;q=0.8"),
        );
        headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            max_retries,
            base_delay,
        })
    }

    /// GET a page, retrying transport errors and non-2xx statuses with linear
    /// backoff (base_delay * attempt). Returns Err only once every attempt has
    /// failed; the crawl loop decides what to do with that.
    pub fn fetch(&self, url: &str) -> Result<String> {
        for attempt in 1..=self.max_retries {
            match self.try_fetch(url) {
                Ok(body) => return Ok(body),
                Err(e) => {
                    eprintln!(
                        "Error fetching {} (attempt {}/{}): {}",
                        url, attempt, self.max_retries, e
                    );
                    if attempt < self.max_retries {
                        thread::sleep(self.base_delay * attempt);
                    }
                }
            }
        }
        Err(anyhow!(
            "Giving up on {} after {} attempts",
            url,
            self.max_retries
        ))
    }

    fn try_fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires network access
    fn test_fetch_live_page() {
        let fetcher = Fetcher::new().expect("Failed to build fetcher");
        let body = fetcher.fetch("https://www.rekrute.com/en/offres.html");
        assert!(body.is_ok());
    }
}
