//! Structural query primitives over a parsed HTML document.
//!
//! [`Document`] pairs a `scraper::Html` tree with the URL it was fetched from
//! so relative links can be resolved wherever a node is inspected. [`Node`]
//! offers the small set of child-text / child-attribute helpers extraction
//! rules need.
//!
//! `scraper::Html` is not `Send`, so a `Document` must be dropped before the
//! owning task awaits anything.

use crate::fetch::Page;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

#[derive(Debug)]
pub struct Document {
    html: Html,
    base: Url,
}

impl Document {
    pub fn new(body: &str, base: Url) -> Self {
        Self {
            html: Html::parse_document(body),
            base,
        }
    }

    pub fn from_page(page: &Page) -> Self {
        Self::new(&page.body, page.url.clone())
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// All nodes matching `selector`, in document order.
    pub fn select_nodes<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = Node<'a>> + 'a {
        self.html.select(selector).map(move |element| Node {
            element,
            base: &self.base,
        })
    }
}

/// One element of a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
    base: &'a Url,
}

impl<'a> Node<'a> {
    /// Concatenated text of all descendants, untrimmed.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Trimmed text of the first descendant matching `selector`, or an empty
    /// string if nothing matches.
    pub fn child_text(&self, selector: &str) -> String {
        self.children(selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    /// Trimmed text of every descendant matching `selector`, in document order.
    pub fn child_texts(&self, selector: &str) -> Vec<String> {
        self.children(selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .collect()
    }

    /// Attribute `name` of the first descendant matching `selector`.
    pub fn child_attr(&self, selector: &str, name: &str) -> Option<&'a str> {
        self.children(selector).next().and_then(|el| el.value().attr(name))
    }

    /// Direct text-node children, untrimmed, skipping elements such as `<br>`.
    pub fn text_nodes(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        self.element
            .children()
            .filter_map(|child| child.value().as_text().map(|t| &**t))
    }

    /// Resolve `href` against the document URL. Empty or unparseable input
    /// yields `None`.
    pub fn absolute_url(&self, href: &str) -> Option<String> {
        join(self.base, href).map(|u| u.to_string())
    }

    /// Like [`Node::absolute_url`] but keeps the parsed [`Url`].
    pub fn join(&self, href: &str) -> Option<Url> {
        join(self.base, href)
    }

    fn children(&self, selector: &str) -> impl Iterator<Item = ElementRef<'a>> + use<'a> {
        let parsed = match Selector::parse(selector) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!(%selector, error = %e, "Invalid child selector");
                None
            }
        };
        let element = self.element;
        parsed
            .into_iter()
            .flat_map(move |s| element.select(&s).collect::<Vec<_>>())
    }
}

fn join(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok()
}
