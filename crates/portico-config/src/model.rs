//! The `portico.toml` configuration model.

use std::fmt::Write as _;
use std::path::Path;

use serde::Deserialize;

use crate::preset::{Preset, ResolvedPreset};
use crate::validate::{ConfigIssue, Severity};

/// Syntax-highlighting palettes shipped with portico.
pub const HIGHLIGHT_THEMES: [&str; 4] = ["github", "dracula", "nord", "one-dark"];

/// Root configuration record, deserialized from `portico.toml`.
///
/// Every field is a static literal fixed at load time. The value is read once
/// by the builder and exposes no mutating operations past validation.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub links: LinkSection,
    pub i18n: I18nConfig,
    pub presets: Vec<Preset>,
    pub theme: ThemeConfig,
    pub home: HomeConfig,
    pub build: BuildSection,
}

impl SiteConfig {
    /// Load and validate configuration from a TOML file.
    ///
    /// All error-level issues are collected before failing; warnings are
    /// logged and do not block the load.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        let config: SiteConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;

        let issues = config.validate();
        let (errors, warnings): (Vec<_>, Vec<_>) = issues
            .into_iter()
            .partition(|i| i.severity == Severity::Error);

        for warning in warnings {
            tracing::warn!("{}", warning);
        }

        if config.site.future.v2 {
            tracing::info!("site.future.v2 is set; no 2.x behavior exists yet");
        }

        if !errors.is_empty() {
            return Err(ConfigError::Invalid(errors));
        }

        Ok(config)
    }

    /// Fold `[[presets]]` in declaration order into effective options.
    pub fn resolved_preset(&self) -> ResolvedPreset {
        ResolvedPreset::fold(&self.presets)
    }

    /// GitHub repository URL, when both identifiers are configured.
    pub fn github_url(&self) -> Option<String> {
        match (&self.site.organization, &self.site.project) {
            (Some(org), Some(project)) => {
                Some(format!("https://github.com/{}/{}", org, project))
            }
            _ => None,
        }
    }
}

/// `[site]` metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Site title
    pub title: String,

    /// Site tagline, shown in the homepage hero
    pub tagline: String,

    /// Site-relative favicon path
    pub favicon: Option<String>,

    /// Absolute production URL
    pub url: String,

    /// Pathname the site is served under; starts and ends with `/`
    pub base_url: String,

    /// GitHub organization or user name
    pub organization: Option<String>,

    /// GitHub repository name
    pub project: Option<String>,

    /// Forward-compatibility flags
    pub future: FutureFlags,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Documentation".to_string(),
            tagline: String::new(),
            favicon: None,
            url: "https://example.com".to_string(),
            base_url: "/".to_string(),
            organization: None,
            project: None,
            future: FutureFlags::default(),
        }
    }
}

/// `[site.future]` flags. Read and logged; reserved for 2.x behavior.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct FutureFlags {
    pub v2: bool,
}

/// What to do when a link points nowhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPolicy {
    Error,
    Warn,
    Ignore,
}

/// `[links]` policies.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkSection {
    /// Internal links in emitted HTML that resolve to no generated route
    pub on_broken: LinkPolicy,

    /// Relative `*.md` links that resolve to no page
    pub on_broken_markdown: LinkPolicy,
}

impl Default for LinkSection {
    fn default() -> Self {
        Self {
            on_broken: LinkPolicy::Error,
            on_broken_markdown: LinkPolicy::Warn,
        }
    }
}

/// `[i18n]` locale settings. Drives the `<html lang>` attribute.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct I18nConfig {
    pub default_locale: String,
    pub locales: Vec<String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            locales: vec!["en".to_string()],
        }
    }
}

/// `[theme]` configuration record.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Image for `og:image` cards
    pub social_card: Option<String>,

    pub navbar: NavbarConfig,
    pub footer: FooterConfig,
    pub highlight: HighlightConfig,
}

/// `[theme.navbar]`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct NavbarConfig {
    /// Navbar brand title; falls back to the site title when empty
    pub title: String,

    pub logo: Option<Logo>,

    /// Ordered navbar items
    pub items: Vec<NavbarItem>,
}

/// Navbar logo.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Logo {
    pub alt: String,
    pub src: String,
}

/// One navbar entry. Carries exactly one of `to` (site-relative) or `href`
/// (external); validation enforces this.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavbarItem {
    pub label: String,
    pub to: Option<String>,
    pub href: Option<String>,
    pub position: NavbarPosition,
}

impl Default for NavbarItem {
    fn default() -> Self {
        Self {
            label: String::new(),
            to: None,
            href: None,
            position: NavbarPosition::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavbarPosition {
    Left,
    Right,
}

/// `[theme.footer]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FooterConfig {
    pub style: FooterStyle,

    /// Copyright line; the literal `{year}` is substituted at build time
    pub copyright: String,

    /// Ordered link groups
    pub links: Vec<FooterGroup>,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            style: FooterStyle::Dark,
            copyright: String::new(),
            links: Vec::new(),
        }
    }
}

impl FooterConfig {
    /// Substitute `{year}` in the configured copyright line.
    pub fn copyright_for_year(&self, year: u16) -> String {
        self.copyright.replace("{year}", &year.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FooterStyle {
    Dark,
    Light,
}

/// A titled group of footer links.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct FooterGroup {
    pub title: String,
    pub items: Vec<FooterLink>,
}

/// One footer link; exactly one of `to`/`href`, like navbar items.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct FooterLink {
    pub label: String,
    pub to: Option<String>,
    pub href: Option<String>,
}

/// `[theme.highlight]` palette names.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HighlightConfig {
    /// Light-mode palette
    pub theme: String,

    /// Dark-mode palette
    pub dark_theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "github".to_string(),
            dark_theme: "dracula".to_string(),
        }
    }
}

/// `[home]` homepage options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomeConfig {
    /// Render the hero section
    pub hero: bool,

    pub primary_action: Option<ActionLink>,
    pub secondary_action: Option<ActionLink>,

    /// Replaces the embedded feature list wholesale when present
    pub features: Option<Vec<HomeFeature>>,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            hero: true,
            primary_action: None,
            secondary_action: None,
            features: None,
        }
    }
}

/// A hero action button.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ActionLink {
    pub label: String,
    pub to: String,
}

/// One `[[home.features]]` entry.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct HomeFeature {
    pub title: String,
    pub image: String,
    pub description: String,
}

/// `[build]` options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSection {
    /// Output directory
    pub output: String,

    /// Directory copied verbatim into the output
    pub static_dir: String,

    /// Minify emitted CSS
    pub minify: bool,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            output: "dist".to_string(),
            static_dir: "static".to_string(),
            minify: true,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration:{}", format_issues(.0))]
    Invalid(Vec<ConfigIssue>),
}

fn format_issues(issues: &[ConfigIssue]) -> String {
    let mut out = String::new();
    for issue in issues {
        let _ = write!(out, "\n  {}", issue);
    }
    out
}
