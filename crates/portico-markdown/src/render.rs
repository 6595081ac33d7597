//! HTML rendering for page content and inline fragments.

use pulldown_cmark::{html, CowStr, Event, Parser, Tag, TagEnd};

use crate::parser::{markdown_options, slugify};

/// Render markdown content to HTML.
///
/// Headings get anchor ids matching the TOC slugs. Relative `*.md` links are
/// passed through `resolve_link`; when it returns a URL the link is rewritten,
/// when it returns `None` the link is left as written (the caller decides what
/// a dangling link means).
pub fn render_html<F>(content: &str, mut resolve_link: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let parser = Parser::new_ext(content, markdown_options());

    let mut events: Vec<Event> = Vec::new();
    // Buffered events of the heading currently being collected, so the anchor
    // id can be computed from its text before the start tag is emitted.
    let mut heading: Option<(Tag, Vec<Event>)> = None;

    for event in parser {
        let event = match event {
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                let dest_url = if is_markdown_link(&dest_url) {
                    match resolve_link(&dest_url) {
                        Some(resolved) => CowStr::from(resolved),
                        None => dest_url,
                    }
                } else {
                    dest_url
                };
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                })
            }
            other => other,
        };

        match event {
            Event::Start(tag @ Tag::Heading { .. }) => {
                heading = Some((tag, Vec::new()));
            }

            Event::End(TagEnd::Heading(level)) => {
                if let Some((tag, inner)) = heading.take() {
                    let text: String = inner
                        .iter()
                        .filter_map(|e| match e {
                            Event::Text(t) | Event::Code(t) => Some(t.as_ref()),
                            _ => None,
                        })
                        .collect();

                    if let Tag::Heading {
                        level,
                        classes,
                        attrs,
                        ..
                    } = tag
                    {
                        events.push(Event::Start(Tag::Heading {
                            level,
                            id: Some(CowStr::from(slugify(&text))),
                            classes,
                            attrs,
                        }));
                    }
                    events.extend(inner);
                }
                events.push(Event::End(TagEnd::Heading(level)));
            }

            other => {
                if let Some((_, ref mut inner)) = heading {
                    inner.push(other);
                } else {
                    events.push(other);
                }
            }
        }
    }

    let mut output = String::new();
    html::push_html(&mut output, events.into_iter());
    output
}

/// Render a one-line markdown fragment without a wrapping `<p>`.
///
/// Used for feature descriptions and similar rich-text snippets, where
/// `` `code` `` spans and emphasis should survive but block structure is
/// unwanted.
pub fn render_inline(fragment: &str) -> String {
    let parser = Parser::new_ext(fragment, markdown_options());

    let events = parser.filter(|e| {
        !matches!(
            e,
            Event::Start(Tag::Paragraph) | Event::End(TagEnd::Paragraph)
        )
    });

    let mut output = String::new();
    html::push_html(&mut output, events);
    output.trim_end().to_string()
}

/// Estimated reading time in whole minutes (200 words per minute, minimum 1).
pub fn reading_time(content: &str) -> u32 {
    let words = content.split_whitespace().count() as u32;
    (words / 200).max(1)
}

/// True for relative links pointing at markdown sources.
fn is_markdown_link(dest: &str) -> bool {
    if dest.contains("://") || dest.starts_with('#') {
        return false;
    }
    let path = dest.split('#').next().unwrap_or(dest);
    path.ends_with(".md")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn injects_heading_anchors() {
        let html = render_html("## Network Isolation\n", |_| None);

        assert!(html.contains(r##"<h2 id="network-isolation">Network Isolation</h2>"##));
    }

    #[test]
    fn rewrites_markdown_links() {
        let html = render_html("See [deployment](deployment.md).", |dest| {
            assert_eq!(dest, "deployment.md");
            Some("/docs/deployment/".to_string())
        });

        assert!(html.contains(r#"<a href="/docs/deployment/">deployment</a>"#));
    }

    #[test]
    fn rewrites_markdown_links_with_fragments() {
        let html = render_html(
            "See [setup](intro.md#setup).",
            |dest| {
                if dest == "intro.md#setup" {
                    Some("/docs/intro/#setup".to_string())
                } else {
                    None
                }
            },
        );

        assert!(html.contains(r#"<a href="/docs/intro/#setup">setup</a>"#));
    }

    #[test]
    fn leaves_external_and_anchor_links_alone() {
        let mut calls = 0;
        let html = render_html(
            "[Ollama](https://ollama.ai/) and [above](#setup).",
            |_| {
                calls += 1;
                None
            },
        );

        assert_eq!(calls, 0);
        assert!(html.contains(r#"href="https://ollama.ai/""#));
        assert!(html.contains(r##"href="#setup""##));
    }

    #[test]
    fn unresolved_markdown_link_is_left_as_written() {
        let html = render_html("[gone](missing.md)", |_| None);

        assert!(html.contains(r#"href="missing.md""#));
    }

    #[test]
    fn code_blocks_carry_language_class() {
        let html = render_html("```bash\ndocker compose up\n```\n", |_| None);

        assert!(html.contains(r#"<code class="language-bash">"#));
    }

    #[test]
    fn renders_inline_without_paragraph() {
        let html = render_inline("perfect for `secure environments`");

        assert_eq!(html, "perfect for <code>secure environments</code>");
    }

    #[test]
    fn inline_render_is_idempotent() {
        let fragment = "Built-in monitoring with **Prometheus** and Grafana.";

        assert_eq!(render_inline(fragment), render_inline(fragment));
    }

    #[test]
    fn reading_time_has_floor_of_one() {
        assert_eq!(reading_time("short"), 1);

        let long = "word ".repeat(650);
        assert_eq!(reading_time(&long), 3);
    }
}
