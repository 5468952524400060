use std::sync::LazyLock;

use regex::Regex;
use rvis_core::models::ScriptLocation;
use serde_json::{Map, Value};

static LOCATIONS_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:let|var|const)\s+locations\s*=\s*\[").expect("valid regex")
});
static LOCATIONS_LAZY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\b(?:let|var|const)\s+locations\s*=\s*(\[.*?\])\s*;").expect("valid regex")
});
static OBJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("valid regex"));
// Keys must start the object body or follow a separator, so `plat:` is not
// read as `lat:`. Numbers may omit the integer part (`.5`).
static LAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[\s,{])["']?lat["']?\s*:\s*["']?([-+]?(?:\d+\.?\d*|\.\d+))"#)
        .expect("valid regex")
});
static LNG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[\s,{])["']?lng["']?\s*:\s*["']?([-+]?(?:\d+\.?\d*|\.\d+))"#)
        .expect("valid regex")
});
static LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[\s,{])["']?label["']?\s*:\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid regex")
});

/// Extract the inline `locations` coordinate array from a results page.
///
/// The literal is normalized to JSON and parsed strictly; if that fails the
/// objects are scraped one by one with patterns. Output order follows the
/// source array. Never fails: a page without the literal yields nothing.
pub fn extract_script_locations(html: &str) -> Vec<ScriptLocation> {
    let Some(literal) = locate_array(html) else {
        return Vec::new();
    };

    match parse_strict(literal) {
        Ok(locations) => locations,
        Err(e) => {
            tracing::debug!(error = %e, "Strict parse of locations array failed, using fallback");
            parse_fallback(literal)
        }
    }
}

/// Text span of the array literal, brackets included.
fn locate_array(html: &str) -> Option<&str> {
    let m = LOCATIONS_ASSIGNMENT.find(html)?;
    let open = m.end() - 1;
    if let Some(span) = extract_balanced_array(html, open) {
        return Some(span);
    }
    LOCATIONS_LAZY
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Slice `[ ... ]` starting at byte `open`, honoring nesting and quotes.
fn extract_balanced_array(src: &str, open: usize) -> Option<&str> {
    let tail = src.get(open..)?;
    if !tail.starts_with('[') {
        return None;
    }

    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, ch) in tail.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' => quote = Some(ch),
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&tail[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_strict(literal: &str) -> Result<Vec<ScriptLocation>, serde_json::Error> {
    let json = normalize_js_literal(literal);
    let values: Vec<Value> = serde_json::from_str(&json)?;
    Ok(values
        .iter()
        .filter_map(Value::as_object)
        .map(location_from_object)
        .collect())
}

fn location_from_object(obj: &Map<String, Value>) -> ScriptLocation {
    let label = text_field(obj.get("label")).or_else(|| text_field(obj.get("name")));
    ScriptLocation {
        label,
        lat: coordinate(obj.get("lat")),
        lng: coordinate(obj.get("lng")),
    }
}

fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn coordinate(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Rewrite a JavaScript array literal as JSON.
///
/// Quotes bare object keys, turns single-quoted strings into double-quoted
/// ones, drops trailing commas and strips comments. Anything else is passed
/// through untouched, so unsupported syntax still fails the JSON parse.
fn normalize_js_literal(src: &str) -> String {
    let chars: Vec<char> = src.chars().collect();
    let mut out = String::with_capacity(src.len() + 16);
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '"' => {
                let end = string_end(&chars, i, '"');
                out.extend(&chars[i..end]);
                i = end;
            }
            '\'' => {
                out.push('"');
                i += 1;
                while i < chars.len() && chars[i] != '\'' {
                    match chars[i] {
                        '\\' if chars.get(i + 1) == Some(&'\'') => {
                            out.push('\'');
                            i += 2;
                        }
                        '\\' => {
                            out.push('\\');
                            if let Some(&next) = chars.get(i + 1) {
                                out.push(next);
                            }
                            i += 2;
                        }
                        '"' => {
                            out.push_str("\\\"");
                            i += 1;
                        }
                        c => {
                            out.push(c);
                            i += 1;
                        }
                    }
                }
                out.push('"');
                i += 1;
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i + 1 < chars.len() && !(chars[i] == '*' && chars[i + 1] == '/') {
                    i += 1;
                }
                i += 2;
            }
            ',' => {
                let next = next_significant(&chars, i + 1);
                if !matches!(next, Some(']') | Some('}')) {
                    out.push(',');
                }
                i += 1;
            }
            c if is_ident_start(c) && matches!(last_significant(&out), Some('{') | Some(',')) => {
                let start = i;
                while i < chars.len() && is_ident_char(chars[i]) {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();
                if next_significant(&chars, i) == Some(':') {
                    out.push('"');
                    out.push_str(&ident);
                    out.push('"');
                } else {
                    out.push_str(&ident);
                }
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Index one past the closing quote of the string opened at `start`.
fn string_end(chars: &[char], start: usize, quote: char) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

fn next_significant(chars: &[char], from: usize) -> Option<char> {
    chars.get(from..)?.iter().copied().find(|c| !c.is_whitespace())
}

fn last_significant(out: &str) -> Option<char> {
    out.trim_end().chars().last()
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Pattern scrape of each `{...}` object. Objects without both coordinates
/// are dropped.
fn parse_fallback(literal: &str) -> Vec<ScriptLocation> {
    OBJECT
        .captures_iter(literal)
        .filter_map(|caps| {
            let body = caps.get(1)?.as_str();
            let lat = capture_number(&LAT, body)?;
            let lng = capture_number(&LNG, body)?;
            let label = LABEL.captures(body).and_then(|c| {
                c.get(1)
                    .or_else(|| c.get(2))
                    .map(|m| m.as_str().trim().to_string())
            });
            Some(ScriptLocation {
                label,
                lat: Some(lat),
                lng: Some(lng),
            })
        })
        .collect()
}

fn capture_number(re: &Regex, body: &str) -> Option<f64> {
    re.captures(body)?.get(1)?.as_str().parse().ok()
}
