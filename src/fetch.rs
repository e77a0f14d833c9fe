//! Document retrieval with exponential backoff retry logic.
//!
//! Providers never talk to `reqwest` directly. They go through the
//! [`FetchAsync`] trait so the same extraction code runs against the live site
//! or against in-memory fixtures.
//!
//! # Architecture
//!
//! - [`FetchAsync`]: core trait, `url -> Page`
//! - [`HttpSource`]: `reqwest`-backed implementation
//! - [`RetryFetch`]: decorator that adds retry logic to any `FetchAsync`
//!
//! # Retry Strategy
//!
//! Only [`ScrapeError::Fetch`] failures are retried. The delay follows
//! `min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)`.

use crate::config::FetchConfig;
use crate::error::ScrapeError;
use rand::{Rng, rng};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};
use url::Url;

/// Desktop browser user agents, one is picked per source when none is configured.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_5) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:127.0) Gecko/20100101 Firefox/127.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
];

/// A retrieved document and its decoded body.
///
/// `url` is the address the body was finally served from, after redirects.
/// Relative links in the body resolve against it.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: Url,
    pub body: String,
}

/// Trait for async document retrieval.
///
/// Implementations must be safe to call from several tasks at once; each call
/// is independent and carries no per-request state into the next one.
pub trait FetchAsync {
    /// Retrieve the document at `url`.
    async fn fetch(&self, url: &Url) -> Result<Page, ScrapeError>;
}

impl<T: FetchAsync> FetchAsync for &T {
    async fn fetch(&self, url: &Url) -> Result<Page, ScrapeError> {
        (**self).fetch(url).await
    }
}

/// `reqwest`-backed document source.
///
/// Cloning is cheap and yields an independent handle over the same connection
/// pool, which is how each provider call gets its own fetch context.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Build a client from the fetch configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Config`] if the proxy URL or a header value is
    /// rejected, or if the TLS backend cannot be initialised.
    pub fn new(config: &FetchConfig) -> Result<Self, ScrapeError> {
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| USER_AGENTS[rng().random_range(0..USER_AGENTS.len())].to_string());

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        let language = HeaderValue::from_str(&config.accept_language)
            .map_err(|e| ScrapeError::Config(format!("accept_language: {e}")))?;
        headers.insert(ACCEPT_LANGUAGE, language);

        let mut builder = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(StdDuration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(10));
        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| ScrapeError::Config(format!("proxy {proxy}: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| ScrapeError::Config(e.to_string()))?;
        Ok(Self { client })
    }
}

impl FetchAsync for HttpSource {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &Url) -> Result<Page, ScrapeError> {
        let t0 = Instant::now();
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ScrapeError::fetch(url.as_str(), e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::http_status(
                url.as_str(),
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
            ));
        }

        // relative links resolve against where the redirects ended up
        let final_url = resp.url().clone();

        let body = resp
            .text()
            .await
            .map_err(|e| ScrapeError::fetch(url.as_str(), e))?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            %final_url,
            "Fetched document"
        );
        Ok(Page { url: final_url, body })
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`FetchAsync`] implementation.
pub struct RetryFetch<T> {
    /// The underlying source to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap.
    max_delay: StdDuration,
}

impl<T> RetryFetch<T>
where
    T: FetchAsync,
{
    /// Create a new retry wrapper around an existing [`FetchAsync`] implementation.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let source = RetryFetch::new(HttpSource::new(&config)?, 2, Duration::from_millis(500));
    /// ```
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(10),
        }
    }

    fn backoff(&self, attempt: usize) -> StdDuration {
        let shift = (attempt - 1).min(16) as u32;
        let delay = self.base_delay.saturating_mul(1 << shift).min(self.max_delay);
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + StdDuration::from_millis(jitter_ms)
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> FetchAsync for RetryFetch<T>
where
    T: FetchAsync,
{
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch(&self, url: &Url) -> Result<Page, ScrapeError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch(url).await {
                Ok(page) => return Ok(page),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => {
                    attempt += 1;
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "fetch() exhausted retries"
                        );
                        return Err(e);
                    }

                    let delay = self.backoff(attempt);
                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_total = total_dt.as_millis() as u64,
                        ?delay,
                        error = %e,
                        "fetch() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// In-memory document source for tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::{FetchAsync, Page};
    use crate::error::ScrapeError;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use url::Url;

    /// Serves fixed bodies by exact URL and remembers every request.
    #[derive(Debug, Default)]
    pub struct StaticSource {
        pages: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl StaticSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl FetchAsync for StaticSource {
        async fn fetch(&self, url: &Url) -> Result<Page, ScrapeError> {
            self.requests.lock().unwrap().push(url.to_string());
            match self.pages.get(url.as_str()) {
                Some(body) => Ok(Page {
                    url: url.clone(),
                    body: body.clone(),
                }),
                None => Err(ScrapeError::http_status(url.as_str(), 404, "Not Found")),
            }
        }
    }
}
