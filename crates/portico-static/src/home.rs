//! Homepage hero and feature grid.

use minijinja::context;

use portico_config::{ActionLink, HomeConfig};
use portico_markdown::render_inline;

use crate::templates::{join_base_url, LinkContext, TemplateEngine};

/// One homepage feature descriptor: a heading, a graphic, and a rich-text
/// description (inline markdown).
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureItem {
    pub title: String,
    /// Site-relative graphic path
    pub image: String,
    /// Markdown fragment rendered inline
    pub description: String,
}

/// The ordered, immutable feature list rendered on the homepage.
///
/// Rendering order equals declaration order, and re-rendering the same list
/// yields byte-identical output.
#[derive(Debug, Clone)]
pub struct FeatureGrid {
    items: Vec<FeatureItem>,
}

impl Default for FeatureGrid {
    /// The embedded default list of three features.
    fn default() -> Self {
        let items = vec![
            FeatureItem {
                title: "🚀 One-Command Deploy".to_string(),
                image: "img/feature-deploy.svg".to_string(),
                description: "Deploy a complete LLM environment with Docker in minutes. \
                              Includes Ollama, Open WebUI, and full monitoring stack with a \
                              single command."
                    .to_string(),
            },
            FeatureItem {
                title: "🔒 Network Isolation".to_string(),
                image: "img/feature-isolation.svg".to_string(),
                description: "Air-gapped deployment with strict network isolation. All \
                              services run locally with no external dependencies - perfect \
                              for `secure environments`."
                    .to_string(),
            },
            FeatureItem {
                title: "📊 Real-time Monitoring".to_string(),
                image: "img/feature-monitoring.svg".to_string(),
                description: "Built-in monitoring with Prometheus, Grafana, cAdvisor, and \
                              Node Exporter. Get insights into system performance and \
                              resource usage out of the box."
                    .to_string(),
            },
        ];

        Self { items }
    }
}

impl FeatureGrid {
    /// Build from homepage config: `[[home.features]]` replaces the embedded
    /// list wholesale, otherwise the default trio renders.
    pub fn from_config(home: &HomeConfig) -> Self {
        match &home.features {
            Some(features) => Self {
                items: features
                    .iter()
                    .map(|f| FeatureItem {
                        title: f.title.clone(),
                        image: f.image.clone(),
                        description: f.description.clone(),
                    })
                    .collect(),
            },
            None => Self::default(),
        }
    }

    pub fn items(&self) -> &[FeatureItem] {
        &self.items
    }

    /// Render one card per item, preserving declaration order.
    pub fn render(
        &self,
        engine: &TemplateEngine,
        base_url: &str,
    ) -> Result<String, minijinja::Error> {
        #[derive(serde::Serialize)]
        struct Card {
            title: String,
            image: String,
            description: String,
        }

        let cards: Vec<Card> = self
            .items
            .iter()
            .map(|item| Card {
                title: item.title.clone(),
                image: join_base_url(base_url, &format!("/{}", item.image.trim_start_matches('/'))),
                description: render_inline(&item.description),
            })
            .collect();

        engine.render("features.html", context! { features => cards })
    }
}

/// Homepage hero context: action buttons with resolved URLs.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Hero {
    pub primary: Option<LinkContext>,
    pub secondary: Option<LinkContext>,
}

impl Hero {
    /// Build from homepage config; `None` when the hero is disabled.
    pub fn from_config(home: &HomeConfig, base_url: &str) -> Option<Self> {
        if !home.hero {
            return None;
        }

        let resolve = |action: &Option<ActionLink>| {
            action.as_ref().map(|a| LinkContext {
                label: a.label.clone(),
                url: join_base_url(base_url, &a.to),
            })
        };

        Some(Self {
            primary: resolve(&home.primary_action),
            secondary: resolve(&home.secondary_action),
        })
    }
}
