//! Text helpers used by templates: slugs, human-readable labels, plain text.

use std::fmt::Write;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::markdown::render_markdown;

/// strftime pattern used when a template gives none.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

static EDGE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s_]+|[\s_]+$").expect("valid regex"));
static UNDERSCORE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_\s]+").expect("valid regex"));
static DASH_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid regex"));
static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[^>]+(>|$)").expect("valid regex"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n]\s*[\r\n]").expect("valid regex"));

/// Convert text to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Turn an identifier such as `data_engineering` into `Data engineering`.
pub fn humanize(text: &str) -> String {
    let trimmed = EDGE_SEPARATORS.replace_all(text, "");
    let spaced = UNDERSCORE_RUNS.replace_all(&trimmed, " ");
    let spaced = DASH_RUNS.replace_all(&spaced, " ");

    let mut chars = spaced.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => c.to_ascii_uppercase().to_string() + chars.as_str(),
        _ => spaced.into_owned(),
    }
}

/// [`humanize`], then capitalize every word.
pub fn titleify(text: &str) -> String {
    humanize(text)
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render Markdown and reduce it to plain text, e.g. for meta descriptions.
pub fn plainify(content: &str) -> String {
    let html = render_markdown(content);
    let text = TAGS.replace_all(&html, "");
    let text = BLANK_LINES.replace_all(&text, "");

    decode_entities(&text)
}

/// Render Markdown as a block, or inline without the wrapping paragraph.
pub fn markdownify(content: &str, block: bool) -> String {
    let html = render_markdown(content);
    if block {
        return html;
    }

    let trimmed = html.trim_end();
    match trimmed
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>"))
    {
        Some(inner) if !inner.contains("<p>") => inner.to_string(),
        _ => html,
    }
}

/// Reformat a content date with a strftime `pattern`.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and `YYYY-MM-DD HH:MM:SS`.
/// Returns `None` when the date does not parse or the pattern is invalid.
pub fn format_date(value: &str, pattern: &str) -> Option<String> {
    let value = value.trim();

    let datetime = DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|date| date.and_time(chrono::NaiveTime::MIN))
        })
        .ok()?;

    let mut out = String::new();
    write!(out, "{}", datetime.format(pattern)).ok()?;
    Some(out)
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Cloud/DevOps"), "clouddevops");
        assert_eq!(slugify("data_engineering"), "data-engineering");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    }

    #[test]
    fn humanizes_identifiers() {
        assert_eq!(humanize("data_engineering"), "Data engineering");
        assert_eq!(humanize("__private__"), "Private");
        assert_eq!(humanize("cloud-devops  tools"), "Cloud devops tools");
        assert_eq!(humanize("Already Fine"), "Already Fine");
    }

    #[test]
    fn titleifies_identifiers() {
        assert_eq!(titleify("data_engineering"), "Data Engineering");
        assert_eq!(titleify("my-first-project"), "My First Project");
    }

    #[test]
    fn plainifies_markdown() {
        assert_eq!(plainify("Some **bold** & 1 < 2"), "Some bold & 1 < 2\n");
        assert_eq!(plainify("# Title\n\nBody"), "Title\nBody\n");
    }

    #[test]
    fn formats_dates() {
        assert_eq!(
            format_date("2024-01-31", DEFAULT_DATE_FORMAT).as_deref(),
            Some("2024-01-31")
        );
        assert_eq!(
            format_date("2024-01-31", "%d %B %Y").as_deref(),
            Some("31 January 2024")
        );
        assert_eq!(
            format_date("2024-01-31T18:30:00+02:00", "%Y-%m-%d %H:%M").as_deref(),
            Some("2024-01-31 18:30")
        );
        assert_eq!(
            format_date("2024-01-31 08:05:00", "%b %-d").as_deref(),
            Some("Jan 31")
        );
        assert_eq!(format_date("last week", DEFAULT_DATE_FORMAT), None);
        assert_eq!(format_date("2024-01-31", "%Q"), None);
    }

    #[test]
    fn markdownify_inline_strips_paragraph() {
        assert_eq!(markdownify("*hi*", false), "<em>hi</em>");
        assert_eq!(markdownify("*hi*", true), "<p><em>hi</em></p>\n");
        assert_eq!(
            markdownify("one\n\ntwo", false),
            "<p>one</p>\n<p>two</p>\n"
        );
    }
}
