//! `Link` response header parsing
//!
//! Shopify delivers its pagination cursor in an RFC 5988 style header:
//!
//! ```text
//! link: <https://shop.myshopify.com/admin/api/2022-01/orders.json?limit=250&page_info=abc>; rel="next"
//! ```
//!
//! The target URL carries an opaque `page_info` token and is handed back to
//! the API verbatim.

use reqwest::header::{HeaderMap, LINK};

/// Relation token marking the next page
const NEXT_RELATION: &str = r#"rel="next""#;

/// Extracts the "next" page URL from a header collection
///
/// Returns `None` when there are no headers, no `link` header, or no entry
/// whose relation is exactly `rel="next"`. Every `link` header is searched in
/// order, and when several entries match, the first one wins.
///
/// # Example
///
/// ```
/// use reqwest::header::{HeaderMap, HeaderValue, LINK};
/// use shopify_sync::next_page_url;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(LINK, HeaderValue::from_static("<https://a.example/p2>; rel=\"next\""));
///
/// assert_eq!(next_page_url(Some(&headers)).as_deref(), Some("https://a.example/p2"));
/// assert_eq!(next_page_url(None), None);
/// ```
pub fn next_page_url(headers: Option<&HeaderMap>) -> Option<String> {
    headers?
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(parse_next_link)
}

/// Finds the `rel="next"` target in a raw `link` header value
pub fn parse_next_link(value: &str) -> Option<String> {
    value.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?;

        if !parts.any(|relation| relation.trim() == NEXT_RELATION) {
            return None;
        }

        let start = target.find('<')?;
        let end = target.rfind('>')?;
        if end <= start {
            return None;
        }

        Some(target[start + 1..end].to_string())
    })
}
