//! xslist performer provider.
//!
//! Profiles live at `https://xslist.org/zh/model/{id}.html`. Most biographical
//! fields are not marked up individually; they are `label: value` lines
//! separated by `<br>` inside the first paragraph of the layout block, so the
//! fields rule walks the paragraph's text nodes instead of selecting elements.

use crate::document::{Document, Node};
use crate::error::ScrapeError;
use crate::fetch::{FetchAsync, Page};
use crate::models::{ActorInfo, ActorSearchResult};
use crate::parser::{parse_date, parse_int};
use crate::pipeline::{Rule, fill, run_rules};
use crate::providers::{ActorProvider, ActorSearcher, Provider};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, instrument};
use url::Url;

pub const NAME: &str = "xslist";
pub const PRIORITY: i64 = 1000;

const BASE_URL: &str = "https://xslist.org/";

/// Value used by the site for unknown fields.
const NOT_APPLICABLE: &str = "n/a";

static DEBUT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([\s\d]+)年([\s\d]+)月$").unwrap());

fn actor_url(id: &str) -> String {
    format!("{BASE_URL}zh/model/{id}.html")
}

fn search_url(keyword: &str) -> String {
    format!("{BASE_URL}search?query={}&lg=zh", urlencoding::encode(keyword))
}

/// Base name of a URL path without its extension: `/zh/model/5589.html` -> `5589`.
fn id_from_path(path: &str) -> String {
    let name = path.rsplit('/').find(|s| !s.is_empty()).unwrap_or_default();
    match name.rfind('.') {
        Some(dot) => name[..dot].to_string(),
        None => name.to_string(),
    }
}

/// Debut dates are usually month precision (`2010年 4月`); fall back to a full date.
fn parse_debut_date(s: &str) -> Option<NaiveDate> {
    if let Some(caps) = DEBUT_RE.captures(s) {
        let year = parse_int(&caps[1])?;
        let month = parse_int(&caps[2])?;
        return NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, u32::try_from(month).ok()?, 1);
    }
    parse_date(s)
}

/// Height in centimetres; `0` means unknown.
fn parse_height(s: &str) -> Option<u32> {
    parse_int(s.trim().trim_end_matches(['c', 'm']))
        .and_then(|h| u32::try_from(h).ok())
        .filter(|h| *h > 0)
}

/// xslist provider over any document source.
#[derive(Debug, Clone)]
pub struct XsList<S> {
    source: S,
}

impl<S> XsList<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

/// Declared order is field priority.
const PROFILE_RULES: &[Rule<ActorInfo>] = &[
    Rule {
        name: "name",
        selector: "#sss1 > header > h1 > span",
        apply: apply_name,
    },
    Rule {
        name: "aliases",
        selector: "#sss1 > p > span",
        apply: apply_alias,
    },
    Rule {
        name: "gallery",
        selector: "#gallery > a",
        apply: apply_gallery,
    },
    Rule {
        name: "fields",
        selector: "#layout > div > p:nth-of-type(1)",
        apply: apply_fields,
    },
    Rule {
        name: "height",
        selector: r#"span[itemprop="height"]"#,
        apply: apply_height,
    },
    Rule {
        name: "nationality",
        selector: r#"span[itemprop="nationality"]"#,
        apply: apply_nationality,
    },
];

const SEARCH_RULES: &[Rule<Vec<ActorSearchResult>>] = &[Rule {
    name: "search-item",
    selector: "ul > li",
    apply: apply_search_item,
}];

fn apply_name(node: &Node<'_>, info: &mut ActorInfo) {
    fill(&mut info.name, node.text().trim().to_string());
}

fn apply_alias(node: &Node<'_>, info: &mut ActorInfo) {
    let alias = node.text().trim().to_string();
    if !alias.is_empty() {
        info.aliases.push(alias);
    }
}

fn apply_gallery(node: &Node<'_>, info: &mut ActorInfo) {
    // the profile thumbnail is too small to be useful
    if node.attr("class") == Some("profile_img") {
        return;
    }
    let dimension = |name: &str| node.attr(name).and_then(parse_int).unwrap_or(0);
    if dimension("data-width") == 0 || dimension("data-height") == 0 {
        return;
    }
    if let Some(url) = node.attr("href").and_then(|href| node.absolute_url(href)) {
        info.images.push(url);
    }
}

fn apply_fields(node: &Node<'_>, info: &mut ActorInfo) {
    for line in node.text_nodes() {
        let Some((label, value)) = line.trim().split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() || value == NOT_APPLICABLE {
            continue;
        }

        match label.trim() {
            "出生" => {
                fill(&mut info.birthday, parse_date(value));
            }
            "三围" => {
                fill(&mut info.measurements, value.replace(' ', ""));
            }
            "罩杯" => {
                let cup = value.strip_suffix("Cup").unwrap_or(value).trim();
                fill(&mut info.cup_size, cup.to_string());
            }
            "出道日期" => {
                fill(&mut info.debut_date, parse_debut_date(value));
            }
            "血型" => {
                fill(&mut info.blood_type, value.to_string());
            }
            "身高" => {
                fill(&mut info.height, parse_height(value));
            }
            "国籍" => {
                fill(&mut info.nationality, value.to_string());
            }
            _ => {}
        }
    }
}

fn apply_height(node: &Node<'_>, info: &mut ActorInfo) {
    fill(&mut info.height, parse_height(&node.text()));
}

fn apply_nationality(node: &Node<'_>, info: &mut ActorInfo) {
    let nationality = node.text().replace(NOT_APPLICABLE, "");
    fill(&mut info.nationality, nationality.trim().to_string());
}

fn apply_search_item(node: &Node<'_>, results: &mut Vec<ActorSearchResult>) {
    let homepage = node.child_attr("h3 a", "href").and_then(|href| node.join(href));
    let id = homepage
        .as_ref()
        .map(|u| id_from_path(u.path()))
        .unwrap_or_default();

    let title = node.child_attr("h3 a", "title").unwrap_or_default();
    let name = match title.split_once('-') {
        Some((_, rest)) => rest.trim().to_string(),
        None => title.to_string(),
    };

    let images = node
        .child_attr("div:first-of-type > img", "src")
        .and_then(|src| node.absolute_url(src))
        .into_iter()
        .collect();

    results.push(ActorSearchResult {
        id,
        name,
        provider: NAME.to_string(),
        homepage: homepage.map(|u| u.to_string()).unwrap_or_default(),
        images,
    });
}

fn extract_profile(page: &Page, seed: ActorInfo) -> ActorInfo {
    let doc = Document::from_page(page);
    let mut info = seed;
    run_rules(&doc, PROFILE_RULES, &mut info);
    info
}

fn extract_search(page: &Page) -> Vec<ActorSearchResult> {
    let doc = Document::from_page(page);
    let mut results = Vec::new();
    run_rules(&doc, SEARCH_RULES, &mut results);
    results
}

impl<S> Provider for XsList<S> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn priority(&self) -> i64 {
        PRIORITY
    }
}

impl<S> ActorProvider for XsList<S>
where
    S: FetchAsync,
{
    async fn get_actor_info_by_id(&self, id: &str) -> Result<ActorInfo, ScrapeError> {
        self.get_actor_info_by_url(&actor_url(id)).await
    }

    #[instrument(level = "info", skip(self))]
    async fn get_actor_info_by_url(&self, raw_url: &str) -> Result<ActorInfo, ScrapeError> {
        let homepage = Url::parse(raw_url)?;
        let id = id_from_path(homepage.path());
        if id.is_empty() {
            return Err(ScrapeError::NotFound(raw_url.to_string()));
        }

        let seed = ActorInfo {
            id,
            provider: NAME.to_string(),
            homepage: homepage.to_string(),
            ..Default::default()
        };

        let page = self.source.fetch(&homepage).await?;
        let actor = extract_profile(&page, seed);

        info!(
            id = %actor.id,
            name = %actor.name,
            aliases = actor.aliases.len(),
            images = actor.images.len(),
            "Extracted xslist profile"
        );
        Ok(actor)
    }
}

impl<S> ActorSearcher for XsList<S>
where
    S: FetchAsync,
{
    #[instrument(level = "info", skip(self))]
    async fn search_actor(&self, keyword: &str) -> Result<Vec<ActorSearchResult>, ScrapeError> {
        let url = Url::parse(&search_url(keyword))?;
        let page = self.source.fetch(&url).await?;
        let results = extract_search(&page);
        info!(count = results.len(), "xslist search complete");
        Ok(results)
    }
}
