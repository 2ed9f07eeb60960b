//! Best-effort recovery of structured values from model replies.
//!
//! A [`ResponseInterpreter`] runs an ordered chain of [`RecoveryStrategy`]
//! values and falls back to a total function of the raw text, so
//! interpretation never fails. Each strategy answers `None` when the reply
//! does not have the shape it understands.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*\n?(.*?)\n?\s*```$")
        .expect("CODE_FENCE is a valid regex")
});

static LIST_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[-*•]+\s*|\(?\d+\s*[.):\-]*\s*)").expect("LIST_PREFIX is a valid regex")
});

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n").expect("PARAGRAPH_BREAK is a valid regex"));

pub trait RecoveryStrategy<T>: Send + Sync {
    fn name(&self) -> &'static str;
    fn try_parse(&self, text: &str) -> Option<T>;
}

/// Result of interpretation together with the rung of the ladder that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation<T> {
    pub value: T,
    pub strategy: &'static str,
}

pub const FALLBACK_STRATEGY: &str = "raw_text";

type Fallback<T> = Box<dyn Fn(&str) -> T + Send + Sync>;

pub struct ResponseInterpreter<T> {
    strategies: Vec<Box<dyn RecoveryStrategy<T>>>,
    fallback: Fallback<T>,
}

impl<T> ResponseInterpreter<T> {
    /// `fallback` receives the trimmed raw reply and must always produce a value.
    pub fn new(fallback: impl Fn(&str) -> T + Send + Sync + 'static) -> Self {
        Self {
            strategies: Vec::new(),
            fallback: Box::new(fallback),
        }
    }

    pub fn then(mut self, strategy: impl RecoveryStrategy<T> + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn interpret(&self, raw: &str) -> Interpretation<T> {
        let text = raw.trim();
        if !text.is_empty() {
            for strategy in &self.strategies {
                if let Some(value) = strategy.try_parse(text) {
                    return Interpretation {
                        value,
                        strategy: strategy.name(),
                    };
                }
            }
        }

        Interpretation {
            value: (self.fallback)(text),
            strategy: FALLBACK_STRATEGY,
        }
    }
}

/// Parses the whole reply as JSON and maps it through `build`.
pub struct JsonStrategy<F> {
    build: F,
}

impl<F> JsonStrategy<F> {
    pub fn new(build: F) -> Self {
        Self { build }
    }
}

impl<T, F> RecoveryStrategy<T> for JsonStrategy<F>
where
    F: Fn(&Value) -> Option<T> + Send + Sync,
{
    fn name(&self) -> &'static str {
        "json"
    }

    fn try_parse(&self, text: &str) -> Option<T> {
        parse_json_reply(text).and_then(|value| (self.build)(&value))
    }
}

/// Slices the reply between header tokens. Every marker must appear, in
/// order, at the start of a line and be followed by a colon or a line end.
/// Markers are regex fragments matched case-insensitively.
pub struct SectionStrategy<F> {
    markers: Vec<Regex>,
    build: F,
}

impl<F> SectionStrategy<F> {
    pub fn new(markers: &[&str], build: F) -> Self {
        let markers = markers
            .iter()
            .map(|marker| {
                Regex::new(&format!(
                    r"(?im)^[ \t#>*_]*(?:{})[ \t*_]*(?::|$)",
                    marker
                ))
                .expect("section marker is a valid regex fragment")
            })
            .collect();
        Self { markers, build }
    }
}

impl<T, F> RecoveryStrategy<T> for SectionStrategy<F>
where
    F: Fn(Vec<String>) -> Option<T> + Send + Sync,
{
    fn name(&self) -> &'static str {
        "section_markers"
    }

    fn try_parse(&self, text: &str) -> Option<T> {
        extract_sections(text, &self.markers).and_then(|sections| (self.build)(sections))
    }
}

/// Line-oriented recovery: paragraphs and numbered or bulleted lists.
pub struct LineStrategy<F> {
    build: F,
}

impl<F> LineStrategy<F> {
    pub fn new(build: F) -> Self {
        Self { build }
    }
}

impl<T, F> RecoveryStrategy<T> for LineStrategy<F>
where
    F: Fn(&str) -> Option<T> + Send + Sync,
{
    fn name(&self) -> &'static str {
        "line_heuristics"
    }

    fn try_parse(&self, text: &str) -> Option<T> {
        (self.build)(text)
    }
}

fn strip_code_fence(text: &str) -> &str {
    CODE_FENCE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(text)
}

/// Escapes raw control characters that appear inside JSON string literals.
/// Models often put literal newlines inside long string values.
fn escape_control_chars_in_strings(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(c);
                continue;
            }
            match c {
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
                c => out.push(c),
            }
        } else {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
        }
    }
    out
}

fn outermost_json(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let close = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Parses a reply as JSON, tolerating a Markdown code fence, prose around
/// the JSON value and raw newlines inside string values.
pub fn parse_json_reply(text: &str) -> Option<Value> {
    let body = strip_code_fence(text.trim());

    let candidates = std::iter::once(body).chain(outermost_json(body));
    for candidate in candidates {
        if let Ok(value) = serde_json::from_str::<Value>(candidate) {
            return Some(value);
        }
        let repaired = escape_control_chars_in_strings(candidate);
        if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
            return Some(value);
        }
    }
    None
}

/// First of `keys` that holds a string, trimmed.
pub fn json_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(|s| s.trim().to_string())
}

/// First of `keys` that holds an array; non-string items are skipped,
/// strings are trimmed and blanks dropped.
pub fn json_string_list(value: &Value, keys: &[&str]) -> Option<Vec<String>> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_array))
        .map(|items| string_items(items))
}

pub fn string_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn extract_sections(text: &str, markers: &[Regex]) -> Option<Vec<String>> {
    let mut bounds: Vec<(usize, usize)> = Vec::with_capacity(markers.len());
    let mut cursor = 0;

    for marker in markers {
        let found = marker.find_at(text, cursor)?;
        bounds.push((found.start(), found.end()));
        cursor = found.end();
    }

    let sections = bounds
        .iter()
        .enumerate()
        .map(|(i, &(_, content_start))| {
            let content_end = bounds.get(i + 1).map(|&(start, _)| start).unwrap_or(text.len());
            text[content_start..content_end].trim().to_string()
        })
        .collect();

    Some(sections)
}

/// Removes a leading list marker such as `1. `, `2) `, `3 - ` or `- `.
pub fn strip_list_prefix(line: &str) -> &str {
    match LIST_PREFIX.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// Splits text into list items: one per non-empty line, list markers,
/// surrounding quotes and trailing commas removed. Lines that are only JSON
/// punctuation are skipped.
pub fn split_list_items(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            strip_list_prefix(line.trim())
                .trim()
                .trim_end_matches(',')
                .trim_matches(|c: char| c == '"' || c == '\'')
                .trim()
        })
        .filter(|item| !item.is_empty() && !item.chars().all(|c| "[]{},".contains(c)))
        .map(str::to_string)
        .collect()
}

/// Splits text on blank lines into trimmed, non-empty paragraphs.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    PARAGRAPH_BREAK
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
