//! Data models for catalog records.
//!
//! This module defines the typed records every provider produces:
//! - [`MovieInfo`]: a single movie page
//! - [`ActorInfo`]: a performer profile
//! - [`ActorSearchResult`]: one hit from a performer search listing
//!
//! List fields are always present (possibly empty) so consumers never have to
//! distinguish "absent" from "empty".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A movie record extracted from a provider's detail page.
///
/// Each scalar field is filled by the first extraction rule that produced a
/// non-empty value for it; see [`crate::pipeline::merge_field`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MovieInfo {
    /// Provider-local identifier, e.g. `"1234"`.
    pub id: String,
    /// Human-facing catalog number, e.g. `"HEYZO-1234"`.
    pub number: String,
    pub provider: String,
    pub homepage: String,
    pub title: String,
    pub summary: String,
    pub maker: String,
    pub series: String,
    pub actors: Vec<String>,
    pub tags: Vec<String>,
    pub cover_url: String,
    pub thumb_url: String,
    pub preview_images: Vec<String>,
    /// Absolute URL of the sample clip.
    pub preview_video_url: Option<String>,
    /// URL of the HLS manifest the sample clip was resolved from.
    pub preview_video_hls_url: Option<String>,
    pub score: Option<f64>,
    /// Running time in minutes.
    pub runtime: Option<u32>,
    pub release_date: Option<NaiveDate>,
}

/// A performer profile.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ActorInfo {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub homepage: String,
    pub aliases: Vec<String>,
    pub images: Vec<String>,
    pub birthday: Option<NaiveDate>,
    pub debut_date: Option<NaiveDate>,
    pub blood_type: String,
    pub cup_size: String,
    pub measurements: String,
    /// Height in centimetres.
    pub height: Option<u32>,
    pub nationality: String,
}

/// One entry of a performer search listing, in document order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ActorSearchResult {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub homepage: String,
    pub images: Vec<String>,
}
