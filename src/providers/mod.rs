//! Catalog site providers.
//!
//! Each provider turns an identifier or URL for one site into a typed record.
//! They all follow the same shape:
//!
//! 1. **Seed**: derive the id from the URL and fill the identifying fields
//! 2. **Fetch**: retrieve the primary page; failure here is the only fatal error
//! 3. **Extract**: run the provider's ordered [`Rule`](crate::pipeline::Rule) table
//! 4. **Resolve**: perform any nested fetch recorded during extraction
//!
//! # Supported Sources
//!
//! | Provider | Module | Kind | Search |
//! |----------|--------|------|--------|
//! | HEYZO | [`heyzo`] | movie | no |
//! | xslist | [`xslist`] | actor | yes |

use crate::error::ScrapeError;
use crate::models::{ActorInfo, ActorSearchResult, MovieInfo};

pub mod heyzo;
pub mod xslist;

/// Name and selection priority shared by every provider.
pub trait Provider {
    fn name(&self) -> &'static str;

    /// Higher wins when an outer layer must choose between providers.
    fn priority(&self) -> i64;
}

/// A site that publishes movie pages.
pub trait MovieProvider: Provider {
    /// Canonicalize a free-form identifier; `None` if the provider does not
    /// recognise it.
    fn normalize_id(&self, id: &str) -> Option<String>;

    /// Derive the provider id from a homepage URL. Not re-validated against
    /// [`MovieProvider::normalize_id`].
    ///
    /// # Errors
    ///
    /// [`ScrapeError::InvalidUrl`] if `raw_url` does not parse, and
    /// [`ScrapeError::NotFound`] if no id can be taken from its path.
    fn parse_id_from_url(&self, raw_url: &str) -> Result<String, ScrapeError>;

    /// Build the homepage for a normalized `id` and delegate to
    /// [`MovieProvider::get_movie_info_by_url`].
    async fn get_movie_info_by_id(&self, id: &str) -> Result<MovieInfo, ScrapeError>;

    /// Fetch and extract one movie page.
    ///
    /// # Arguments
    ///
    /// * `raw_url` - Absolute homepage URL; its path supplies the record id
    ///
    /// # Returns
    ///
    /// The seeded record filled by every rule that matched. An unmatched
    /// page still returns the seed.
    ///
    /// # Errors
    ///
    /// Bad input as for [`MovieProvider::parse_id_from_url`], or the
    /// [`ScrapeError::Fetch`] of the primary page. Nested fetches never fail
    /// the call.
    async fn get_movie_info_by_url(&self, raw_url: &str) -> Result<MovieInfo, ScrapeError>;
}

/// A site that publishes performer profiles.
pub trait ActorProvider: Provider {
    /// Canonicalize a free-form identifier. The default accepts any
    /// non-empty trimmed input.
    fn normalize_id(&self, id: &str) -> Option<String> {
        let id = id.trim();
        (!id.is_empty()).then(|| id.to_string())
    }

    async fn get_actor_info_by_id(&self, id: &str) -> Result<ActorInfo, ScrapeError>;

    /// Fetch and extract one profile page.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::InvalidUrl`], [`ScrapeError::NotFound`] when the path
    /// yields no id, or the primary page's [`ScrapeError::Fetch`].
    async fn get_actor_info_by_url(&self, raw_url: &str) -> Result<ActorInfo, ScrapeError>;
}

/// A site that can search its performer catalog.
pub trait ActorSearcher: Provider {
    /// Run a keyword search and return one result per listing entry, in page
    /// order. An entry with an unusable link keeps an empty `homepage` and `id`.
    ///
    /// # Errors
    ///
    /// The [`ScrapeError::Fetch`] of the search page.
    async fn search_actor(&self, keyword: &str) -> Result<Vec<ActorSearchResult>, ScrapeError>;
}

/// Registered movie providers as `(name, priority)`.
pub const MOVIE_PROVIDERS: &[(&str, i64)] = &[(heyzo::NAME, heyzo::PRIORITY)];

/// Registered actor providers as `(name, priority)`.
pub const ACTOR_PROVIDERS: &[(&str, i64)] = &[(xslist::NAME, xslist::PRIORITY)];

/// Case-insensitive lookup of a registered provider name.
pub fn lookup(registry: &[(&'static str, i64)], name: &str) -> Option<&'static str> {
    registry
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name.trim()))
        .map(|(n, _)| *n)
}

/// Whether `input` should be treated as a URL rather than an identifier.
pub fn looks_like_url(input: &str) -> bool {
    let input = input.trim_start();
    input.starts_with("http://") || input.starts_with("https://")
}
