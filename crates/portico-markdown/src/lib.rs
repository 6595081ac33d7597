//! Markdown page pipeline for portico.
//!
//! This crate parses markdown pages with YAML frontmatter, builds a table of
//! contents, and renders page content and inline fragments to HTML.

pub mod date;
pub mod frontmatter;
pub mod parser;
pub mod render;

pub use date::Date;
pub use frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};
pub use parser::{parse_page, ParseError, ParsedPage, TocEntry};
pub use render::{reading_time, render_html, render_inline};
