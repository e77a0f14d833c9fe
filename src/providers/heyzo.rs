//! HEYZO movie provider.
//!
//! Movie pages live at `https://www.heyzo.com/moviepages/{id:04}/index.html`.
//! Most fields are published twice: once in a JSON-LD block and again in
//! human-readable markup. The JSON-LD rule runs first so it wins; the markup
//! rules only fill what it left empty.
//!
//! # Sample video
//!
//! The player script carries `movieId`, `siteID` and a `stream` URL template.
//! Filling the template gives an HLS manifest; the variant it lists encodes the
//! path of the downloadable sample:
//!
//! ```text
//! /sample/{a}/{b}/ts.{file}.m3u8  ->  https://www.heyzo.com/contents/{a}/{b}/{file}
//! ```

use crate::document::{Document, Node};
use crate::error::ScrapeError;
use crate::fetch::{FetchAsync, Page};
use crate::models::MovieInfo;
use crate::parser::{parse_date, parse_runtime, parse_score};
use crate::pipeline::{Rule, fill, run_rules};
use crate::providers::{MovieProvider, Provider};
use crate::resolve::{ManifestRequest, resolve_manifest};
use crate::script::{capture, capture_all, decode_captured_island, decode_island, splice, str_at};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument};
use url::Url;

pub const NAME: &str = "HEYZO";
pub const PRIORITY: i64 = 1000;

const BASE_URL: &str = "https://www.heyzo.com/";

static ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?i)(?:heyzo-)?(\d+)$").unwrap());
static EMVIDEO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"emvideo = "(.+?)";"#).unwrap());
static RUNTIME_ISLAND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"o = (\{.+?\});").unwrap());
static MOVIE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"movieId\s*=\s*'(\d+?)';").unwrap());
static SITE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"siteID\s*=\s*'(\d+?)';").unwrap());
static STREAM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"stream\s*=\s*'(.+?)'\+siteID\+'(.+?)'\+movieId\+'(.+?)';").unwrap()
});
static SAMPLE_URI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/sample/(\d+)/(\d+)/ts\.(.+?)\.m3u8").unwrap());
static PREVIEW_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""(/contents/[^"]+/\d+\.\w+)""#).unwrap());

fn movie_url(id: &str) -> String {
    format!("{BASE_URL}moviepages/{id:0>4}/index.html")
}

fn sample_url(media_uri: &str) -> Option<String> {
    let caps = SAMPLE_URI_RE.captures(media_uri)?;
    Some(format!("{BASE_URL}contents/{}/{}/{}", &caps[1], &caps[2], &caps[3]))
}

/// HEYZO provider over any document source.
#[derive(Debug, Clone)]
pub struct Heyzo<S> {
    source: S,
}

impl<S> Heyzo<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

/// Mutable state threaded through the rule table.
#[derive(Debug, Default)]
struct Extraction {
    info: MovieInfo,
    manifest: Option<ManifestRequest>,
}

/// Declared order is field priority.
const RULES: &[Rule<Extraction>] = &[
    Rule {
        name: "json-ld",
        selector: r#"script[type="application/ld+json"]"#,
        apply: apply_json_ld,
    },
    Rule {
        name: "title",
        selector: "#movie > h1",
        apply: apply_title,
    },
    Rule {
        name: "summary",
        selector: r#"p[class="memo"]"#,
        apply: apply_summary,
    },
    Rule {
        name: "og-image",
        selector: r#"meta[property="og:image"]"#,
        apply: apply_og_image,
    },
    Rule {
        name: "details-table",
        selector: r#"table[class="movieInfo"] > tbody > tr"#,
        apply: apply_details_row,
    },
    Rule {
        name: "tags",
        selector: r#"ul[class="tag-keyword-list"]"#,
        apply: apply_tags,
    },
    Rule {
        name: "inline-scripts",
        selector: r#"script[type="text/javascript"]"#,
        apply: apply_inline_script,
    },
    Rule {
        name: "player",
        selector: "#playerContainer > script",
        apply: apply_player_script,
    },
    Rule {
        name: "preview-images",
        selector: r#"div[class="sample-images yoxview"] > script"#,
        apply: apply_preview_images,
    },
];

fn fill_cover(info: &mut MovieInfo, url: Option<String>) {
    let url = url.unwrap_or_default();
    fill(&mut info.cover_url, url.clone());
    fill(&mut info.thumb_url, url);
}

fn apply_json_ld(node: &Node<'_>, ctx: &mut Extraction) {
    let Some(data) = decode_island(&node.text()) else {
        return;
    };
    let info = &mut ctx.info;

    fill(&mut info.title, str_at(&data, "/name").unwrap_or_default());
    fill(&mut info.summary, str_at(&data, "/description").unwrap_or_default());
    fill_cover(info, str_at(&data, "/image").and_then(|img| node.absolute_url(&img)));
    fill(
        &mut info.release_date,
        str_at(&data, "/releasedEvent/startDate").and_then(|s| parse_date(&s)),
    );
    fill(
        &mut info.runtime,
        str_at(&data, "/video/duration").and_then(|s| parse_runtime(&s)),
    );
    fill(
        &mut info.score,
        str_at(&data, "/aggregateRating/ratingValue").and_then(|s| parse_score(&s)),
    );
    fill(&mut info.maker, str_at(&data, "/video/provider").unwrap_or_default());
    fill(
        &mut info.actors,
        str_at(&data, "/video/actor").map(|a| vec![a]).unwrap_or_default(),
    );
}

fn apply_title(node: &Node<'_>, ctx: &mut Extraction) {
    let text = node.text();
    let first_word = text.split_whitespace().next().unwrap_or_default();
    fill(&mut ctx.info.title, first_word.to_string());
}

fn apply_summary(node: &Node<'_>, ctx: &mut Extraction) {
    fill(&mut ctx.info.summary, node.text().trim().to_string());
}

fn apply_og_image(node: &Node<'_>, ctx: &mut Extraction) {
    let url = node.attr("content").and_then(|c| node.absolute_url(c));
    fill_cover(&mut ctx.info, url);
}

fn apply_details_row(node: &Node<'_>, ctx: &mut Extraction) {
    let info = &mut ctx.info;
    match node.child_text("td:nth-of-type(1)").as_str() {
        "公開日" => {
            fill(
                &mut info.release_date,
                parse_date(&node.child_text("td:nth-of-type(2)")),
            );
        }
        "出演" => {
            let actors = node
                .child_texts("td:nth-of-type(2) > a > span")
                .into_iter()
                .filter(|a| !a.is_empty())
                .collect();
            fill(&mut info.actors, actors);
        }
        "シリーズ" => {
            let series = node.child_text("td:nth-of-type(2)");
            fill(&mut info.series, series.trim_matches('-').trim().to_string());
        }
        "評価" => {
            fill(
                &mut info.score,
                parse_score(&node.child_text(r#"span[itemprop="ratingValue"]"#)),
            );
        }
        _ => {}
    }
}

fn apply_tags(node: &Node<'_>, ctx: &mut Extraction) {
    fill(&mut ctx.info.tags, node.child_texts("li > a"));
}

fn apply_inline_script(node: &Node<'_>, ctx: &mut Extraction) {
    let text = node.text();
    let info = &mut ctx.info;

    if text.contains("emvideo") {
        if let Some(src) = capture(&EMVIDEO_RE, &text) {
            fill(&mut info.preview_video_url, node.absolute_url(src));
        }
    }

    if text.contains("o = {") {
        let full = decode_captured_island(&RUNTIME_ISLAND_RE, &text).and_then(|v| str_at(&v, "/full"));
        fill(&mut info.runtime, full.and_then(|f| parse_runtime(&f)));
    }
}

fn apply_player_script(node: &Node<'_>, ctx: &mut Extraction) {
    let text = node.text();
    if !text.contains("movieId") {
        return;
    }

    let (Some(movie_id), Some(site_id)) = (capture(&MOVIE_ID_RE, &text), capture(&SITE_ID_RE, &text)) else {
        return;
    };
    let Some(caps) = STREAM_RE.captures(&text) else {
        return;
    };
    let Some(path) = splice(&[&caps[1], &caps[2], &caps[3]], &[site_id, movie_id]) else {
        return;
    };

    match node.join(&path) {
        Some(url) => {
            debug!(%url, "Found sample manifest reference");
            fill(&mut ctx.manifest, Some(ManifestRequest { url }));
        }
        None => debug!(%path, "Manifest path does not resolve"),
    }
}

fn apply_preview_images(node: &Node<'_>, ctx: &mut Extraction) {
    let text = node.text();
    for path in capture_all(&PREVIEW_IMAGE_RE, &text) {
        if let Some(url) = node.absolute_url(path) {
            ctx.info.preview_images.push(url);
        }
    }
}

/// Parse the page and run the rule table. The parsed tree does not outlive this call.
fn extract(page: &Page, seed: MovieInfo) -> Extraction {
    let doc = Document::from_page(page);
    let mut ctx = Extraction {
        info: seed,
        manifest: None,
    };
    run_rules(&doc, RULES, &mut ctx);
    ctx
}

/// Id from the parent directory of the page, e.g. `/moviepages/1234/index.html` -> `1234`.
fn id_from_homepage(homepage: &Url) -> Option<String> {
    let segments: Vec<&str> = homepage.path_segments()?.collect();
    let parent = segments.len().checked_sub(2).map(|i| segments[i])?;
    (!parent.is_empty()).then(|| parent.to_string())
}

impl<S> Heyzo<S>
where
    S: FetchAsync,
{
    /// Patch preview fields from the manifest recorded during extraction.
    async fn apply_manifest(&self, request: &ManifestRequest, info: &mut MovieInfo) {
        let Some(resolution) = resolve_manifest(&self.source, request).await else {
            return;
        };
        info.preview_video_hls_url = Some(resolution.manifest_url);

        match resolution.media_uri.as_deref().and_then(sample_url) {
            Some(url) => info.preview_video_url = Some(url),
            None => debug!(
                media_uri = ?resolution.media_uri,
                "Manifest media URI has no sample path; keeping earlier preview video"
            ),
        }
    }
}

impl<S> Provider for Heyzo<S> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn priority(&self) -> i64 {
        PRIORITY
    }
}

impl<S> MovieProvider for Heyzo<S>
where
    S: FetchAsync,
{
    fn normalize_id(&self, id: &str) -> Option<String> {
        ID_RE.captures(id).map(|c| c[1].to_string())
    }

    fn parse_id_from_url(&self, raw_url: &str) -> Result<String, ScrapeError> {
        let homepage = Url::parse(raw_url)?;
        id_from_homepage(&homepage).ok_or_else(|| ScrapeError::NotFound(raw_url.to_string()))
    }

    async fn get_movie_info_by_id(&self, id: &str) -> Result<MovieInfo, ScrapeError> {
        self.get_movie_info_by_url(&movie_url(id)).await
    }

    #[instrument(level = "info", skip(self))]
    async fn get_movie_info_by_url(&self, raw_url: &str) -> Result<MovieInfo, ScrapeError> {
        let id = self.parse_id_from_url(raw_url)?;
        let homepage = Url::parse(raw_url)?;

        let seed = MovieInfo {
            number: format!("HEYZO-{id}"),
            id,
            provider: NAME.to_string(),
            homepage: raw_url.to_string(),
            ..Default::default()
        };

        let page = self.source.fetch(&homepage).await?;
        let Extraction { mut info, manifest } = extract(&page, seed);

        if let Some(request) = manifest {
            self.apply_manifest(&request, &mut info).await;
        }
        fill(&mut info.maker, NAME.to_string());

        info!(
            id = %info.id,
            title = %info.title,
            tags = info.tags.len(),
            preview_images = info.preview_images.len(),
            has_preview_video = info.preview_video_url.is_some(),
            "Extracted HEYZO movie"
        );
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StaticSource;
    use chrono::NaiveDate;

    const HOMEPAGE: &str = "https://www.heyzo.com/moviepages/1234/index.html";

    const JSON_LD: &str = r#"<script type="application/ld+json">
        {"@context":"http://schema.org","@type":"Movie","name":"Summer Vacation",
         "image":"//www.heyzo.com/contents/3000/1234/images/player_thumbnail_450.jpg",
         "description":"A long description.",
         "releasedEvent":{"startDate":"2021-01-02"},
         "video":{"duration":"PT00H59M10S","actor":"Jane Doe","provider":"HEYZO Premium"},
         "aggregateRating":{"ratingValue":"4.2"}}
        </script>"#;

    const BODY: &str = r#"
        <div id="movie">
          <h1>Summer Vacation - Jane Doe</h1>
          <p class="memo">  Fallback memo.  </p>
          <table class="movieInfo"><tbody>
            <tr><td>公開日</td><td>2020-12-31</td></tr>
            <tr><td>出演</td><td><a href="/a/1"><span>Jane Doe</span></a> <a href="/a/2"><span>Mary Major</span></a></td></tr>
            <tr><td>シリーズ</td><td>-Summer Series-</td></tr>
            <tr><td>評価</td><td><span itemprop="ratingValue">3.5</span></td></tr>
            <tr><td>その他</td><td>ignored</td></tr>
          </tbody></table>
          <ul class="tag-keyword-list"><li><a>B</a></li><li><a>A</a></li><li><a>B</a></li></ul>
        </div>
        <script type="text/javascript">var emvideo = "/contents/3000/1234/sample.mp4";</script>
        <script type="text/javascript">var o = {"full":"01:00:00","sample":"00:01:00"};</script>
        <div id="playerContainer"><script>
          var movieId = '1234';
          var siteID = '1';
          var stream = '/hls/'+siteID+'/'+movieId+'/index.m3u8';
        </script></div>
        <div class="sample-images yoxview"><script>
          var imgs = ["/contents/3000/1234/gallery/001.jpg","/contents/3000/1234/gallery/002.jpg"];
        </script></div>
    "#;

    const MANIFEST_URL: &str = "https://www.heyzo.com/hls/1/1234/index.m3u8";

    fn page(with_json_ld: bool) -> String {
        let json_ld = if with_json_ld { JSON_LD } else { "" };
        format!(
            r#"<html><head>
            <meta property="og:image" content="/contents/3000/1234/images/player_thumbnail.jpg">
            {json_ld}</head><body>{BODY}</body></html>"#
        )
    }

    fn master_playlist(uri: &str) -> String {
        format!("#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=1500000,RESOLUTION=1280x720\n{uri}\n")
    }

    #[test]
    fn test_normalize_id() {
        let heyzo = Heyzo::new(StaticSource::new());
        assert_eq!(heyzo.normalize_id("heyzo-1234").as_deref(), Some("1234"));
        assert_eq!(heyzo.normalize_id("HEYZO-0042").as_deref(), Some("0042"));
        assert_eq!(heyzo.normalize_id("1234").as_deref(), Some("1234"));
        assert_eq!(heyzo.normalize_id("heyzo1234"), None);
        assert_eq!(heyzo.normalize_id("heyzo-"), None);
        assert_eq!(heyzo.normalize_id("abc-1234"), None);
        assert_eq!(heyzo.normalize_id(""), None);
    }

    #[test]
    fn test_normalize_id_is_idempotent() {
        let heyzo = Heyzo::new(StaticSource::new());
        for raw in ["heyzo-1234", "Heyzo-0001", "42", "HEYZO-99999"] {
            let once = heyzo.normalize_id(raw).unwrap();
            assert_eq!(heyzo.normalize_id(&once), Some(once.clone()), "{raw}");
        }
    }

    #[test]
    fn test_movie_url_pads_to_four_digits() {
        assert_eq!(movie_url("1234"), HOMEPAGE);
        assert_eq!(movie_url("42"), "https://www.heyzo.com/moviepages/0042/index.html");
    }

    #[test]
    fn test_parse_id_from_url() {
        let heyzo = Heyzo::new(StaticSource::new());
        assert_eq!(heyzo.parse_id_from_url(HOMEPAGE).unwrap(), "1234");
        assert_eq!(
            heyzo
                .parse_id_from_url("https://www.heyzo.com/moviepages/1234/")
                .unwrap(),
            "1234"
        );
        // URL-derived ids are not re-validated against the id grammar.
        assert_eq!(
            heyzo
                .parse_id_from_url("https://www.heyzo.com/moviepages/special-abc/index.html")
                .unwrap(),
            "special-abc"
        );
        assert!(matches!(
            heyzo.parse_id_from_url("https://www.heyzo.com/index.html"),
            Err(ScrapeError::NotFound(_))
        ));
        assert!(matches!(
            heyzo.parse_id_from_url("not a url"),
            Err(ScrapeError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_sample_url() {
        assert_eq!(
            sample_url("/sample/7/8/ts.foo.m3u8").as_deref(),
            Some("https://www.heyzo.com/contents/7/8/foo")
        );
        assert_eq!(sample_url("/other/7/8/foo.m3u8"), None);
    }

    #[tokio::test]
    async fn test_get_by_id_end_to_end() {
        let html = r#"<html><body>
            <table class="movieInfo"><tbody><tr><td>公開日</td><td>2021-01-02</td></tr></tbody></table>
            <ul class="tag-keyword-list"><li><a>A</a></li><li><a>B</a></li></ul>
            </body></html>"#;
        let source = StaticSource::new().with_page(HOMEPAGE, html);
        let heyzo = Heyzo::new(&source);

        let id = heyzo.normalize_id("heyzo-1234").unwrap();
        let info = heyzo.get_movie_info_by_id(&id).await.unwrap();

        assert_eq!(info.id, "1234");
        assert_eq!(info.number, "HEYZO-1234");
        assert_eq!(info.provider, "HEYZO");
        assert_eq!(info.homepage, HOMEPAGE);
        assert_eq!(info.release_date, NaiveDate::from_ymd_opt(2021, 1, 2));
        assert_eq!(info.tags, vec!["A", "B"]);
        assert_eq!(info.maker, "HEYZO");
        assert_eq!(info.preview_video_url, None);
        assert_eq!(info.preview_video_hls_url, None);
        assert_eq!(source.requests(), vec![HOMEPAGE.to_string()]);
    }

    #[tokio::test]
    async fn test_structured_island_wins_over_markup() {
        let source = StaticSource::new()
            .with_page(HOMEPAGE, &page(true))
            .with_page(MANIFEST_URL, &master_playlist("/sample/3000/1234/ts.sample.mp4.m3u8"));
        let info = Heyzo::new(source).get_movie_info_by_url(HOMEPAGE).await.unwrap();

        assert_eq!(info.title, "Summer Vacation");
        assert_eq!(info.summary, "A long description.");
        assert_eq!(
            info.cover_url,
            "https://www.heyzo.com/contents/3000/1234/images/player_thumbnail_450.jpg"
        );
        assert_eq!(info.thumb_url, info.cover_url);
        assert_eq!(info.release_date, NaiveDate::from_ymd_opt(2021, 1, 2));
        assert_eq!(info.runtime, Some(59));
        assert_eq!(info.score, Some(4.2));
        assert_eq!(info.maker, "HEYZO Premium");
        assert_eq!(info.actors, vec!["Jane Doe"]);
        // Fields only the markup carries still come through.
        assert_eq!(info.series, "Summer Series");
        assert_eq!(info.tags, vec!["B", "A", "B"]);
        assert_eq!(
            info.preview_images,
            vec![
                "https://www.heyzo.com/contents/3000/1234/gallery/001.jpg",
                "https://www.heyzo.com/contents/3000/1234/gallery/002.jpg",
            ]
        );
        assert_eq!(
            info.preview_video_url.as_deref(),
            Some("https://www.heyzo.com/contents/3000/1234/sample.mp4")
        );
        assert_eq!(info.preview_video_hls_url.as_deref(), Some(MANIFEST_URL));
    }

    #[tokio::test]
    async fn test_markup_fallbacks_without_json_ld() {
        let source = StaticSource::new().with_page(HOMEPAGE, &page(false));
        let info = Heyzo::new(source).get_movie_info_by_url(HOMEPAGE).await.unwrap();

        assert_eq!(info.title, "Summer");
        assert_eq!(info.summary, "Fallback memo.");
        assert_eq!(
            info.cover_url,
            "https://www.heyzo.com/contents/3000/1234/images/player_thumbnail.jpg"
        );
        assert_eq!(info.release_date, NaiveDate::from_ymd_opt(2020, 12, 31));
        assert_eq!(info.actors, vec!["Jane Doe", "Mary Major"]);
        assert_eq!(info.score, Some(3.5));
        assert_eq!(info.runtime, Some(60));
        assert_eq!(info.maker, "HEYZO");
    }

    #[tokio::test]
    async fn test_zero_rating_and_duration_fall_back_to_markup() {
        let json_ld = r#"<script type="application/ld+json">
            {"name":"Placeholder","video":{"duration":"PT00H00M00S"},
             "aggregateRating":{"ratingValue":"0"}}
            </script>"#;
        let html = format!("<html><head>{json_ld}</head><body>{BODY}</body></html>");
        let source = StaticSource::new().with_page(HOMEPAGE, &html);
        let info = Heyzo::new(source).get_movie_info_by_url(HOMEPAGE).await.unwrap();

        assert_eq!(info.title, "Placeholder");
        assert_eq!(info.score, Some(3.5));
        assert_eq!(info.runtime, Some(60));
    }

    #[tokio::test]
    async fn test_manifest_resolution_rewrites_sample_url() {
        let html = r#"<html><body>
            <div id="playerContainer"><script>
              var movieId='55'; var siteID='9';
              stream = '/x/'+siteID+'/y/'+movieId+'/z';
            </script></div></body></html>"#;
        let manifest = "https://www.heyzo.com/x/9/y/55/z";
        let source = StaticSource::new()
            .with_page(HOMEPAGE, html)
            .with_page(manifest, &master_playlist("/sample/7/8/ts.foo.m3u8"));
        let heyzo = Heyzo::new(&source);

        let info = heyzo.get_movie_info_by_url(HOMEPAGE).await.unwrap();

        assert_eq!(source.requests(), vec![HOMEPAGE.to_string(), manifest.to_string()]);
        assert_eq!(info.preview_video_hls_url.as_deref(), Some(manifest));
        assert_eq!(
            info.preview_video_url.as_deref(),
            Some("https://www.heyzo.com/contents/7/8/foo")
        );
    }

    #[tokio::test]
    async fn test_missing_token_skips_manifest_fetch() {
        let html = r#"<html><body>
            <div id="playerContainer"><script>
              var movieId='55';
              stream = '/x/'+siteID+'/y/'+movieId+'/z';
            </script></div></body></html>"#;
        let source = StaticSource::new().with_page(HOMEPAGE, html);
        let info = Heyzo::new(&source).get_movie_info_by_url(HOMEPAGE).await.unwrap();

        assert_eq!(source.requests(), vec![HOMEPAGE.to_string()]);
        assert_eq!(info.preview_video_hls_url, None);
    }

    #[tokio::test]
    async fn test_failed_manifest_fetch_keeps_earlier_preview() {
        let source = StaticSource::new().with_page(HOMEPAGE, &page(false));
        let info = Heyzo::new(&source).get_movie_info_by_url(HOMEPAGE).await.unwrap();

        assert_eq!(source.requests(), vec![HOMEPAGE.to_string(), MANIFEST_URL.to_string()]);
        assert_eq!(
            info.preview_video_url.as_deref(),
            Some("https://www.heyzo.com/contents/3000/1234/sample.mp4")
        );
        assert_eq!(info.preview_video_hls_url, None);
    }

    #[tokio::test]
    async fn test_unrecognised_manifest_uri_still_records_manifest() {
        let source = StaticSource::new()
            .with_page(HOMEPAGE, &page(false))
            .with_page(MANIFEST_URL, &master_playlist("/elsewhere/playlist.m3u8"));
        let info = Heyzo::new(source).get_movie_info_by_url(HOMEPAGE).await.unwrap();

        assert_eq!(info.preview_video_hls_url.as_deref(), Some(MANIFEST_URL));
        assert_eq!(
            info.preview_video_url.as_deref(),
            Some("https://www.heyzo.com/contents/3000/1234/sample.mp4")
        );
    }

    #[tokio::test]
    async fn test_primary_fetch_failure_is_returned() {
        let heyzo = Heyzo::new(StaticSource::new());
        let err = heyzo.get_movie_info_by_url(HOMEPAGE).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Fetch { ref url, .. } if url == HOMEPAGE));
    }

    #[tokio::test]
    async fn test_unmatched_page_yields_seeded_record() {
        let source = StaticSource::new().with_page(HOMEPAGE, "<html><body><p>nothing</p></body></html>");
        let info = Heyzo::new(source).get_movie_info_by_url(HOMEPAGE).await.unwrap();

        let expected = MovieInfo {
            id: "1234".to_string(),
            number: "HEYZO-1234".to_string(),
            provider: "HEYZO".to_string(),
            homepage: HOMEPAGE.to_string(),
            maker: "HEYZO".to_string(),
            ..Default::default()
        };
        assert_eq!(info, expected);
    }

    #[test]
    fn test_malformed_json_ld_is_ignored() {
        let html = r#"<html><head><script type="application/ld+json">{"name": broken</script></head>
            <body><div id="movie"><h1>Fallback Title</h1></div></body></html>"#;
        let page = Page {
            url: Url::parse(HOMEPAGE).unwrap(),
            body: html.to_string(),
        };
        let ctx = extract(&page, MovieInfo::default());
        assert_eq!(ctx.info.title, "Fallback");
        assert_eq!(ctx.manifest, None);
    }

    #[test]
    fn test_all_rule_selectors_parse() {
        for rule in RULES {
            assert!(
                scraper::Selector::parse(rule.selector).is_ok(),
                "rule {} has an invalid selector",
                rule.name
            );
        }
    }
}
