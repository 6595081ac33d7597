//! Collect-all configuration validation.

use std::collections::HashSet;
use std::fmt;

use url::Url;

use crate::model::{SiteConfig, HIGHLIGHT_THEMES};

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fails the load
    Error,
    /// Logged, load proceeds
    Warning,
}

/// One validation finding: a field path, what is wrong, and optionally how to
/// fix it.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub path: String,
    pub message: String,
    pub hint: Option<String>,
}

impl ConfigIssue {
    fn error(path: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path: path.to_string(),
            message: message.into(),
            hint: None,
        }
    }

    fn warning(path: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path: path.to_string(),
            message: message.into(),
            hint: None,
        }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}

impl SiteConfig {
    /// Validate the loaded configuration, collecting every issue in order.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        self.validate_site(&mut issues);
        self.validate_i18n(&mut issues);
        self.validate_presets(&mut issues);
        self.validate_theme(&mut issues);

        issues
    }

    fn validate_site(&self, issues: &mut Vec<ConfigIssue>) {
        if self.site.title.is_empty() {
            issues.push(ConfigIssue::error("site.title", "must not be empty"));
        }

        match Url::parse(&self.site.url) {
            Ok(url) => {
                if !matches!(url.scheme(), "http" | "https") {
                    issues.push(
                        ConfigIssue::error("site.url", "must be an http or https URL")
                            .with_hint(format!("got scheme '{}'", url.scheme())),
                    );
                } else if url.host_str().is_none() {
                    issues.push(ConfigIssue::error("site.url", "must have a host"));
                }
            }
            Err(e) => {
                issues.push(
                    ConfigIssue::error("site.url", format!("not a valid URL: {}", e))
                        .with_hint("e.g. https://example.github.io"),
                );
            }
        }

        if !self.site.base_url.starts_with('/') || !self.site.base_url.ends_with('/') {
            issues.push(
                ConfigIssue::error("site.base_url", "must start and end with '/'")
                    .with_hint("e.g. \"/\" or \"/my-project/\""),
            );
        }

        if self.site.organization.is_some() != self.site.project.is_some() {
            issues.push(
                ConfigIssue::warning(
                    "site",
                    "only one of organization/project is set",
                )
                .with_hint("GitHub links need both"),
            );
        }
    }

    fn validate_i18n(&self, issues: &mut Vec<ConfigIssue>) {
        if self.i18n.default_locale.is_empty() {
            issues.push(ConfigIssue::error("i18n.default_locale", "must not be empty"));
        }

        if self.i18n.locales.is_empty() {
            issues.push(ConfigIssue::error("i18n.locales", "must not be empty"));
        } else if !self.i18n.locales.contains(&self.i18n.default_locale) {
            issues.push(
                ConfigIssue::error("i18n.locales", "must contain the default locale")
                    .with_hint(format!("add \"{}\"", self.i18n.default_locale)),
            );
        }
    }

    fn validate_presets(&self, issues: &mut Vec<ConfigIssue>) {
        if self.presets.is_empty() {
            issues.push(
                ConfigIssue::error("presets", "at least one preset is required")
                    .with_hint("add [[presets]] with name = \"classic\""),
            );
        }

        let mut seen = HashSet::new();
        for (idx, preset) in self.presets.iter().enumerate() {
            let path = format!("presets[{}].name", idx);
            if preset.name.is_empty() {
                issues.push(ConfigIssue::error(&path, "must not be empty"));
            } else if !seen.insert(preset.name.as_str()) {
                issues.push(
                    ConfigIssue::warning(&path, format!("duplicate preset '{}'", preset.name))
                        .with_hint("later presets override earlier ones"),
                );
            }
        }
    }

    fn validate_theme(&self, issues: &mut Vec<ConfigIssue>) {
        for (idx, item) in self.theme.navbar.items.iter().enumerate() {
            let path = format!("theme.navbar.items[{}]", idx);
            validate_link_target(&path, item.label.as_str(), &item.to, &item.href, issues);
        }

        for (group_idx, group) in self.theme.footer.links.iter().enumerate() {
            if group.title.is_empty() {
                issues.push(ConfigIssue::error(
                    &format!("theme.footer.links[{}].title", group_idx),
                    "must not be empty",
                ));
            }
            for (item_idx, item) in group.items.iter().enumerate() {
                let path = format!(
                    "theme.footer.links[{}].items[{}]",
                    group_idx, item_idx
                );
                validate_link_target(&path, item.label.as_str(), &item.to, &item.href, issues);
            }
        }

        for (path, name) in [
            ("theme.highlight.theme", &self.theme.highlight.theme),
            ("theme.highlight.dark_theme", &self.theme.highlight.dark_theme),
        ] {
            if !HIGHLIGHT_THEMES.contains(&name.as_str()) {
                issues.push(
                    ConfigIssue::error(path, format!("unknown highlight theme '{}'", name))
                        .with_hint(format!("one of: {}", HIGHLIGHT_THEMES.join(", "))),
                );
            }
        }
    }
}

/// A link item must carry exactly one of `to`/`href`, and `to` must be
/// site-relative.
fn validate_link_target(
    path: &str,
    label: &str,
    to: &Option<String>,
    href: &Option<String>,
    issues: &mut Vec<ConfigIssue>,
) {
    if label.is_empty() {
        issues.push(ConfigIssue::error(&format!("{}.label", path), "must not be empty"));
    }

    match (to, href) {
        (Some(_), Some(_)) => {
            issues.push(ConfigIssue::error(
                path,
                "carries both 'to' and 'href'; use exactly one",
            ));
        }
        (None, None) => {
            issues.push(
                ConfigIssue::error(path, "needs a link target")
                    .with_hint("'to' for internal pages, 'href' for external URLs"),
            );
        }
        (Some(to), None) => {
            if !to.starts_with('/') {
                issues.push(
                    ConfigIssue::error(&format!("{}.to", path), "must start with '/'")
                        .with_hint("use 'href' for external URLs"),
                );
            }
        }
        (None, Some(_)) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> SiteConfig {
        toml::from_str(
            r#"
[site]
title = "LLM Stack"
url = "https://example.github.io"
base_url = "/llm-stack/"

[[presets]]
name = "classic"
"#,
        )
        .unwrap()
    }

    fn errors(config: &SiteConfig) -> Vec<ConfigIssue> {
        config
            .validate()
            .into_iter()
            .filter(|i| i.severity == Severity::Error)
            .collect()
    }

    #[test]
    fn valid_config_has_no_errors() {
        assert!(errors(&valid_config()).is_empty());
    }

    #[test]
    fn empty_title_is_an_error() {
        let mut config = valid_config();
        config.site.title.clear();

        let errors = errors(&config);
        assert!(errors.iter().any(|i| i.path == "site.title"));
    }

    #[test]
    fn invalid_url_is_an_error() {
        let mut config = valid_config();
        config.site.url = "not a url".to_string();
        assert!(errors(&config).iter().any(|i| i.path == "site.url"));

        config.site.url = "ftp://example.com".to_string();
        assert!(errors(&config).iter().any(|i| i.path == "site.url"));
    }

    #[test]
    fn base_url_must_be_slash_delimited() {
        let mut config = valid_config();
        config.site.base_url = "llm-stack/".to_string();
        assert!(errors(&config).iter().any(|i| i.path == "site.base_url"));

        config.site.base_url = "/llm-stack".to_string();
        assert!(errors(&config).iter().any(|i| i.path == "site.base_url"));
    }

    #[test]
    fn locales_must_contain_default() {
        let mut config = valid_config();
        config.i18n.locales = vec!["fr".to_string()];

        assert!(errors(&config).iter().any(|i| i.path == "i18n.locales"));
    }

    #[test]
    fn presets_must_be_non_empty() {
        let mut config = valid_config();
        config.presets.clear();

        assert!(errors(&config).iter().any(|i| i.path == "presets"));
    }

    #[test]
    fn duplicate_preset_names_warn() {
        let mut config = valid_config();
        config.presets.push(config.presets[0].clone());

        let issues = config.validate();
        let dup = issues
            .iter()
            .find(|i| i.path == "presets[1].name")
            .unwrap();
        assert_eq!(dup.severity, Severity::Warning);
    }

    #[test]
    fn navbar_item_needs_exactly_one_target() {
        let config: SiteConfig = toml::from_str(
            r#"
[site]
title = "T"
url = "https://example.com"

[[presets]]
name = "classic"

[[theme.navbar.items]]
label = "Both"
to = "/docs/"
href = "https://example.com"

[[theme.navbar.items]]
label = "Neither"
"#,
        )
        .unwrap();

        let errors = errors(&config);
        assert!(errors.iter().any(|i| i.path == "theme.navbar.items[0]"));
        assert!(errors.iter().any(|i| i.path == "theme.navbar.items[1]"));
    }

    #[test]
    fn internal_links_must_be_rooted() {
        let config: SiteConfig = toml::from_str(
            r#"
[site]
title = "T"
url = "https://example.com"

[[presets]]
name = "classic"

[[theme.footer.links]]
title = "Docs"

[[theme.footer.links.items]]
label = "Intro"
to = "docs/intro/"
"#,
        )
        .unwrap();

        assert!(errors(&config)
            .iter()
            .any(|i| i.path == "theme.footer.links[0].items[0].to"));
    }

    #[test]
    fn unknown_highlight_theme_is_an_error() {
        let mut config = valid_config();
        config.theme.highlight.dark_theme = "solarized".to_string();

        assert!(errors(&config)
            .iter()
            .any(|i| i.path == "theme.highlight.dark_theme"));
    }

    #[test]
    fn lone_organization_warns() {
        let mut config = valid_config();
        config.site.organization = Some("someone".to_string());

        let issues = config.validate();
        let warn = issues.iter().find(|i| i.path == "site").unwrap();
        assert_eq!(warn.severity, Severity::Warning);
        assert!(errors(&config).is_empty());
    }
}
