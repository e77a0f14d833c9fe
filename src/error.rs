//! Error taxonomy shared by every provider.
//!
//! Only two kinds of failure ever reach a provider caller: bad input (an
//! identifier or URL the provider cannot handle) and a failed primary fetch.
//! [`ScrapeError::Config`] is raised once, while building the fetch layer.
//! [`ScrapeError::Decode`] exists so decoders have something typed to log, but
//! it is always swallowed where it is raised.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The identifier does not match the provider's grammar, or no identifier
    /// could be derived from the URL.
    #[error("unrecognized identifier: {0:?}")]
    NotFound(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Network, HTTP status or body failure while retrieving a document.
    /// `status` is set when the server answered with a non-success code.
    #[error("fetch failed for {url}: {reason}")]
    Fetch {
        url: String,
        reason: String,
        status: Option<u16>,
    },

    /// The fetch layer could not be built from its configuration.
    #[error("invalid fetch configuration: {0}")]
    Config(String),

    /// Malformed embedded payload or manifest.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ScrapeError {
    /// A transport or body failure with no HTTP status.
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.to_string(),
            status: None,
        }
    }

    /// A non-success HTTP answer.
    pub fn http_status(url: impl Into<String>, status: u16, reason: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: format!("HTTP status {status} {}", reason.to_string()).trim_end().to_string(),
            status: Some(status),
        }
    }

    /// Whether retrying the same request could succeed.
    ///
    /// Transport failures, timeouts (`408`), throttling (`429`) and server
    /// errors are retried. Other client errors such as `404` are final.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Fetch { status: None, .. } => true,
            Self::Fetch {
                status: Some(code), ..
            } => *code >= 500 || *code == 408 || *code == 429,
            _ => false,
        }
    }
}
