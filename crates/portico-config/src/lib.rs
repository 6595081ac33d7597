//! Site configuration for portico.
//!
//! This crate models `portico.toml`: site metadata, link policies, i18n,
//! ordered presets, theme configuration, homepage options, and build options.
//! The configuration is loaded once, validated, and never mutated afterwards.

pub mod model;
pub mod preset;
pub mod validate;

pub use model::{
    ActionLink, BuildSection, ConfigError, FooterConfig, FooterGroup, FooterLink, FooterStyle,
    FutureFlags, HighlightConfig, HomeConfig, HomeFeature, I18nConfig, LinkPolicy, LinkSection,
    Logo, NavbarConfig, NavbarItem, NavbarPosition, SiteConfig, SiteSection, ThemeConfig,
    HIGHLIGHT_THEMES,
};
pub use preset::{BlogOptions, DocsOptions, FeedKind, Preset, ResolvedPreset, ThemeOptions};
pub use validate::{ConfigIssue, Severity};
