//! Named configuration bundles and their fold into effective options.

use serde::Deserialize;

/// One `[[presets]]` entry: a named bundle of option groups.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Preset {
    pub name: String,
    pub docs: Option<DocsOptions>,
    pub blog: Option<BlogOptions>,
    pub theme: Option<ThemeOptions>,
}

/// `[presets.docs]` options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsOptions {
    /// Source directory for docs pages
    pub dir: String,

    /// Path to a sidebar ordering file
    pub sidebar: Option<String>,

    /// URL prefix for "Edit this page" links
    pub edit_url: Option<String>,
}

impl Default for DocsOptions {
    fn default() -> Self {
        Self {
            dir: "docs".to_string(),
            sidebar: None,
            edit_url: None,
        }
    }
}

/// `[presets.blog]` options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogOptions {
    /// Source directory for blog posts
    pub dir: String,

    /// Show estimated reading time on posts
    pub reading_time: bool,

    /// Feeds to generate
    pub feeds: Vec<FeedKind>,

    /// URL prefix for "Edit this page" links
    pub edit_url: Option<String>,
}

impl Default for BlogOptions {
    fn default() -> Self {
        Self {
            dir: "blog".to_string(),
            reading_time: true,
            feeds: vec![FeedKind::Rss, FeedKind::Atom],
            edit_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Rss,
    Atom,
}

/// `[presets.theme]` options.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeOptions {
    /// Extra stylesheet copied into the output and linked after the default one
    pub custom_css: Option<String>,
}

/// Effective options after folding all presets.
#[derive(Debug, Clone, Default)]
pub struct ResolvedPreset {
    pub docs: DocsOptions,
    pub blog: BlogOptions,
    pub theme: ThemeOptions,
}

impl ResolvedPreset {
    /// Fold presets in declaration order.
    ///
    /// Later presets override earlier ones option-group by option-group: a
    /// preset that sets `[presets.docs]` replaces the whole docs group, while
    /// groups it omits are left as previously resolved.
    pub fn fold(presets: &[Preset]) -> Self {
        let mut resolved = Self::default();

        for preset in presets {
            if let Some(docs) = &preset.docs {
                resolved.docs = docs.clone();
            }
            if let Some(blog) = &preset.blog {
                resolved.blog = blog.clone();
            }
            if let Some(theme) = &preset.theme {
                resolved.theme = theme.clone();
            }
        }

        resolved
    }
}
