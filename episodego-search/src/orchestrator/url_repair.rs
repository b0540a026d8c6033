//! Destination URL repair and validation.
//!
//! Search engines hand back destinations wrapped in redirectors, without a
//! scheme, or percent-encoded twice. These helpers recover a usable
//! absolute URL or reject it before the candidate ever gets scored.

use std::borrow::Cow;

use url::Url;

/// Prefix of the engine's click-through redirect wrapper.
const REDIRECT_PREFIX: &str = "/url?q=";

/// Strip a `/url?q=<dest>&...` redirect wrapper.
///
/// Returns `None` when `href` is not wrapped. The destination is cut at
/// the first `&`, which starts the wrapper's own tracking parameters.
///
/// ```
/// use episodego_search::orchestrator::url_repair::unwrap_redirect;
///
/// let dest = unwrap_redirect("/url?q=https://en.wikipedia.org/wiki/Friends&sa=U&ved=x");
/// assert_eq!(dest, Some("https://en.wikipedia.org/wiki/Friends"));
/// assert_eq!(unwrap_redirect("https://example.com"), None);
/// ```
pub fn unwrap_redirect(href: &str) -> Option<&str> {
    let rest = href.strip_prefix(REDIRECT_PREFIX)?;
    Some(rest.split('&').next().unwrap_or(rest))
}

/// Prefix `https://` when the URL carries no http(s) scheme.
pub fn ensure_scheme(raw: &str) -> String {
    if has_http_scheme(raw) {
        raw.to_owned()
    } else {
        format!("https://{raw}")
    }
}

/// Returns `true` if `raw` starts with `http://` or `https://` (any case).
pub fn has_http_scheme(raw: &str) -> bool {
    let lower = raw.get(..8).unwrap_or(raw).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Returns `true` if the URL contains any blocked substring (case-insensitive).
pub fn is_blocked(url: &str, blocked: &[String]) -> bool {
    let lower = url.to_lowercase();
    blocked
        .iter()
        .any(|b| !b.is_empty() && lower.contains(&b.to_lowercase()))
}

/// Undo one level of double percent-encoding (`%25xx` → `%xx`).
pub fn repair_double_encoding(url: &str) -> Cow<'_, str> {
    if url.contains("%25") {
        Cow::Owned(url.replace("%25", "%"))
    } else {
        Cow::Borrowed(url)
    }
}

/// Parse a destination, requiring an http(s) scheme and a non-empty host.
pub fn validate_destination(raw: &str) -> Option<Url> {
    let parsed = Url::parse(raw).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Some(parsed),
        _ => None,
    }
}

/// Repair then validate a destination.
///
/// The repaired text is returned as-is rather than re-serialised, so
/// callers see the same URL the engine linked to.
pub fn repair_destination(raw: &str) -> Option<String> {
    let repaired = repair_double_encoding(raw);
    validate_destination(&repaired)?;
    Some(repaired.into_owned())
}

/// Whether two URLs address the same document, ignoring fragments.
pub fn same_page(a: &Url, b: &Url) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    a.set_fragment(None);
    b.set_fragment(None);
    a == b
}
