//! Markdown rendering for content fields.

use pulldown_cmark::{html, Options, Parser};
use serde_yaml::{Mapping, Value};

/// Fields whose key ends with this suffix hold Markdown.
pub const MARKDOWN_SUFFIX: &str = "_markdown";

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Render a Markdown string to HTML.
pub fn render_markdown(content: &str) -> String {
    let parser = Parser::new_ext(content, options());

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}

/// Replace every `*_markdown` string in `mapping` with its HTML rendering.
///
/// Nested mappings are transformed as well. Sequences are left untouched.
pub fn transform_markdown(mapping: &mut Mapping) -> &mut Mapping {
    for (key, value) in mapping.iter_mut() {
        let is_markdown = key
            .as_str()
            .is_some_and(|k| k.ends_with(MARKDOWN_SUFFIX));

        match value {
            Value::String(text) if is_markdown => {
                *text = render_markdown(text);
            }
            Value::Mapping(inner) => {
                transform_markdown(inner);
            }
            _ => {}
        }
    }

    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn renders_markdown() {
        let html = render_markdown("# Hello\n\nWorld");

        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<p>World</p>"));
    }

    #[test]
    fn renders_fenced_code() {
        let html = render_markdown("```python\nprint('hi')\n```");

        assert!(html.contains("<pre><code class=\"language-python\">"));
        assert!(html.contains("print("));
    }

    #[test]
    fn transforms_only_markdown_fields() {
        let mut data = mapping(
            r#"
title: "**not markdown**"
intro_markdown: "Some *emphasis*"
"#,
        );

        transform_markdown(&mut data);

        assert_eq!(data["title"].as_str(), Some("**not markdown**"));
        assert_eq!(
            data["intro_markdown"].as_str(),
            Some("<p>Some <em>emphasis</em></p>\n")
        );
    }

    #[test]
    fn transforms_nested_mappings() {
        let mut data = mapping(
            r#"
section:
  body_markdown: "A [link](https://example.com)"
  deeper:
    text_markdown: "`code`"
"#,
        );

        transform_markdown(&mut data);

        let section = &data["section"];
        assert!(section["body_markdown"]
            .as_str()
            .unwrap()
            .contains("<a href=\"https://example.com\">link</a>"));
        assert_eq!(
            section["deeper"]["text_markdown"].as_str(),
            Some("<p><code>code</code></p>\n")
        );
    }

    #[test]
    fn leaves_sequences_and_non_strings_alone() {
        let mut data = mapping(
            r#"
count_markdown: 3
list:
  - body_markdown: "*kept*"
"#,
        );

        transform_markdown(&mut data);

        assert_eq!(data["count_markdown"].as_u64(), Some(3));
        assert_eq!(data["list"][0]["body_markdown"].as_str(), Some("*kept*"));
    }
}
