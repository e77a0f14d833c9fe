//! Second-phase resolution of streaming manifests.
//!
//! Extraction rules run over a parsed tree that cannot live across an
//! `.await`, so a rule that discovers a manifest reference only records a
//! [`ManifestRequest`]. Once the traversal is finished and the tree dropped,
//! the assembler hands the request to [`resolve_manifest`], which performs the
//! nested fetch and reads the playlist.
//!
//! Failures here never fail the record: a missing or broken manifest just
//! means the preview fields keep whatever the first phase put there.

use crate::fetch::FetchAsync;
use crate::m3u8;
use crate::utils::truncate_for_log;
use tracing::{debug, instrument, warn};
use url::Url;

/// A manifest URL discovered during extraction, already absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRequest {
    pub url: Url,
}

/// What a successful manifest fetch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The manifest URL itself; recorded even if the body could not be parsed.
    pub manifest_url: String,
    /// Media URI selected from the playlist, if it parsed.
    pub media_uri: Option<String>,
}

/// Fetch and read the manifest recorded during extraction.
///
/// # Arguments
///
/// * `source` - The same document source the primary page came from
/// * `request` - Absolute manifest URL
///
/// # Returns
///
/// `None` only when the fetch itself failed. A body that is not a playlist
/// still yields a [`Resolution`] with `media_uri` unset.
#[instrument(level = "info", skip_all, fields(url = %request.url))]
pub async fn resolve_manifest<S: FetchAsync>(source: &S, request: &ManifestRequest) -> Option<Resolution> {
    let page = match source.fetch(&request.url).await {
        Ok(page) => page,
        Err(e) => {
            warn!(error = %e, "Manifest fetch failed; keeping earlier preview fields");
            return None;
        }
    };

    let media_uri = match m3u8::parse_media_uri(&page.body) {
        Ok(uri) => {
            debug!(%uri, "Manifest media URI");
            Some(uri)
        }
        Err(e) => {
            debug!(error = %e, body = %truncate_for_log(&page.body, 200), "Manifest did not parse");
            None
        }
    };

    Some(Resolution {
        manifest_url: request.url.to_string(),
        media_uri,
    })
}
