//! Page text and outbound-link extraction.
//!
//! Turns a fetched candidate page into the text blob that gets scored and
//! the list of outbound links that secondary-page scoring follows.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{Result, SearchError};
use crate::orchestrator::url_repair::{is_blocked, same_page};
use crate::types::PageContent;

/// Elements whose text is never visible page content.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg"];

/// Extract the title and visible text from raw HTML.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] if the page has neither a title nor any
/// visible text.
pub fn extract_content(html: &str, url: &str) -> Result<PageContent> {
    let document = Html::parse_document(html);

    let title = extract_title(&document);
    let text = match body(&document) {
        Some(body) => visible_text(body),
        None => visible_text(document.root_element()),
    };

    if title.is_empty() && text.is_empty() {
        return Err(SearchError::Parse("no extractable content found".into()));
    }

    let word_count = text.split_whitespace().count();
    Ok(PageContent {
        url: url.to_owned(),
        title,
        text,
        word_count,
    })
}

/// Collect up to `limit` outbound links from a page.
///
/// Links are resolved against `page_url` and kept only when they are
/// http(s), not blocked, not the page itself, and not already collected.
/// Document order is preserved.
pub fn outbound_links(html: &str, page_url: &str, blocked: &[String], limit: usize) -> Vec<String> {
    if limit == 0 {
        return Vec::new();
    }
    let Ok(base) = Url::parse(page_url) else {
        return Vec::new();
    };
    let Ok(anchor) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut links: Vec<Url> = Vec::new();

    for element in document.select(&anchor) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Ok(mut resolved) = base.join(href.trim()) else {
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        resolved.set_fragment(None);
        if same_page(&resolved, &base)
            || is_blocked(resolved.as_str(), blocked)
            || links.contains(&resolved)
        {
            continue;
        }
        links.push(resolved);
        if links.len() >= limit {
            break;
        }
    }

    links.into_iter().map(String::from).collect()
}

fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .map(|t| collapse_whitespace(&t))
        .unwrap_or_default()
}

fn body(document: &Html) -> Option<ElementRef<'_>> {
    let selector = Selector::parse("body").ok()?;
    document.select(&selector).next()
}

/// Visible text under `root`, whitespace-collapsed.
fn visible_text(root: ElementRef<'_>) -> String {
    let mut words: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_TAGS.contains(&el.name()))
        });
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }
    words.join(" ")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
