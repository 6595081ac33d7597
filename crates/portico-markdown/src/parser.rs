//! Markdown page parser.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};

/// A parsed markdown page.
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Errors that can occur when parsing a page.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Markdown extensions enabled for all page content.
pub(crate) fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Parse a markdown page.
///
/// Extracts frontmatter and generates a table of contents. Heading anchor ids
/// here match the ids injected by [`crate::render::render_html`], so TOC links
/// resolve in the rendered page.
pub fn parse_page(source: &str) -> Result<ParsedPage, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    let mut toc = Vec::new();
    let parser = Parser::new_ext(content, markdown_options());

    let mut current_heading: Option<(u8, String)> = None;
    let mut in_code_block = false;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,

            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((level as u8, String::new()));
            }

            Event::Text(text) | Event::Code(text) => {
                if in_code_block {
                    continue;
                }
                if let Some((_, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&text);
                }
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current_heading.take() {
                    let id = slugify(&title);
                    toc.push(TocEntry { title, id, level });
                }
            }

            _ => {}
        }
    }

    Ok(ParsedPage {
        frontmatter,
        content: content.to_string(),
        toc,
    })
}

/// Convert a heading to a URL-safe slug.
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

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_complete_page() {
        let source = r#"---
title: Monitoring
description: Metrics and dashboards
---

# Monitoring

Prometheus scrapes every service.

## Dashboards

Grafana ships preconfigured.
"#;

        let page = parse_page(source).unwrap();

        let fm = page.frontmatter.unwrap();
        assert_eq!(fm.title, "Monitoring");
        assert_eq!(fm.description, Some("Metrics and dashboards".to_string()));

        assert_eq!(page.toc.len(), 2);
        assert_eq!(page.toc[0].title, "Monitoring");
        assert_eq!(page.toc[0].level, 1);
        assert_eq!(page.toc[0].id, "monitoring");
        assert_eq!(page.toc[1].title, "Dashboards");
        assert_eq!(page.toc[1].level, 2);
    }

    #[test]
    fn parses_without_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter.";

        let page = parse_page(source).unwrap();

        assert!(page.frontmatter.is_none());
        assert_eq!(page.toc.len(), 1);
        assert_eq!(page.toc[0].title, "Just Markdown");
    }

    #[test]
    fn toc_includes_inline_code_in_headings() {
        let source = "# Using `docker compose`\n";

        let page = parse_page(source).unwrap();

        assert_eq!(page.toc[0].title, "Using docker compose");
        assert_eq!(page.toc[0].id, "using-docker-compose");
    }

    #[test]
    fn toc_skips_code_block_content() {
        let source = "# Real Heading\n\n```\n# not a heading\n```\n";

        let page = parse_page(source).unwrap();

        assert_eq!(page.toc.len(), 1);
        assert_eq!(page.toc[0].title, "Real Heading");
    }

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("API Reference"), "api-reference");
        assert_eq!(slugify("Setup (Linux)"), "setup-linux");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    }
}
