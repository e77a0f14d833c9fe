//! Minimal HLS playlist reading.
//!
//! Only one question is ever asked of a manifest: which media URI does it point
//! at? For a master playlist that is the variant with the tallest
//! `RESOLUTION`; for a media playlist it is the first segment URI.

use crate::error::ScrapeError;

/// Pick a single media URI out of an HLS playlist body.
///
/// # Errors
///
/// [`ScrapeError::Decode`] if the body is not an `#EXTM3U` playlist or lists no URI.
pub fn parse_media_uri(body: &str) -> Result<String, ScrapeError> {
    let mut lines = body
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty());

    match lines.next() {
        Some(first) if first.starts_with("#EXTM3U") => {}
        _ => return Err(ScrapeError::Decode("missing #EXTM3U header".to_string())),
    }

    // (height, uri) of the best variant seen so far
    let mut best: Option<(u32, &str)> = None;
    let mut pending_height: Option<u32> = None;
    let mut first_uri: Option<&str> = None;

    for line in lines {
        if let Some(attrs) = line.strip_prefix("#EXT-X-STREAM-INF:") {
            pending_height = Some(resolution_height(attrs).unwrap_or(0));
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        if first_uri.is_none() {
            first_uri = Some(line);
        }
        if let Some(height) = pending_height.take() {
            if best.is_none_or(|(h, _)| height > h) {
                best = Some((height, line));
            }
        }
    }

    best.map(|(_, uri)| uri)
        .or(first_uri)
        .map(str::to_string)
        .ok_or_else(|| ScrapeError::Decode("playlist lists no media URI".to_string()))
}

/// Height component of a `RESOLUTION=WxH` attribute.
fn resolution_height(attrs: &str) -> Option<u32> {
    attrs
        .split(',')
        .find_map(|kv| kv.trim().strip_prefix("RESOLUTION="))
        .and_then(|res| res.split_once('x'))
        .and_then(|(_, h)| h.trim().parse().ok())
}
