use std::sync::LazyLock;

use scraper::{Html, Selector};

static CSRF_INPUT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"input[name="_csrf"]"#).expect("valid selector"));
static CSRF_META: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="_csrf"]"#).expect("valid selector"));

/// Extract the anti-forgery token from a landing page.
///
/// The hidden `_csrf` form input wins; a `<meta name="_csrf">` tag is the
/// fallback. Blank values count as absent.
pub fn extract_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let from_input = document
        .select(&CSRF_INPUT)
        .filter_map(|el| el.value().attr("value"))
        .map(str::trim)
        .find(|v| !v.is_empty());
    if let Some(token) = from_input {
        return Some(token.to_string());
    }

    document
        .select(&CSRF_META)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}
