//! Initialize a documentation site in a project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing portico site...");

    let files: &[(&str, &str)] = &[
        (".gitignore", DEFAULT_GITIGNORE),
        ("portico.toml", DEFAULT_CONFIG),
        ("sidebars.toml", DEFAULT_SIDEBARS),
        ("docs/intro.md", DEFAULT_INTRO),
        ("docs/llm-deployment.md", DEFAULT_DEPLOYMENT),
        ("docs/monitoring.md", DEFAULT_MONITORING),
        ("blog/2025-06-15-welcome.md", DEFAULT_POST),
        ("css/custom.css", DEFAULT_CSS),
        ("static/img/logo.svg", LOGO_SVG),
        ("static/img/social-card.svg", SOCIAL_CARD_SVG),
        ("static/img/feature-deploy.svg", FEATURE_DEPLOY_SVG),
        ("static/img/feature-isolation.svg", FEATURE_ISOLATION_SVG),
        ("static/img/feature-monitoring.svg", FEATURE_MONITORING_SVG),
    ];

    for (path, content) in files {
        write_scaffold(Path::new(path), content, yes)?;
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'portico dev' to start the development server.");

    Ok(())
}

/// Write a scaffold file, leaving existing content alone unless `--yes`.
fn write_scaffold(path: &Path, content: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        tracing::warn!("{} already exists, skipping. Use --yes to overwrite.", path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());

    Ok(())
}

const DEFAULT_GITIGNORE: &str = "dist/\n.portico/\n";

const DEFAULT_CONFIG: &str = r#"# Portico configuration

[site]
title = "🧠 Isolated Local LLM Stack"
tagline = "Fully automated solution for deploying LLMs locally with Docker, network isolation and real-time monitoring"
favicon = "img/logo.svg"
url = "https://mohamedaminehamdi.github.io"
base_url = "/"
organization = "mohamedaminehamdi"
project = "Isolated-Local-LLM-Deployment-Monitoring-Stack"

[links]
on_broken = "error"
on_broken_markdown = "warn"

[i18n]
default_locale = "en"
locales = ["en"]

[[presets]]
name = "classic"

[presets.docs]
sidebar = "sidebars.toml"
edit_url = "https://github.com/mohamedaminehamdi/Isolated-Local-LLM-Deployment-Monitoring-Stack/tree/main/docs/"

[presets.blog]
reading_time = true
feeds = ["rss", "atom"]

[presets.theme]
custom_css = "css/custom.css"

[theme]
social_card = "img/social-card.svg"

[theme.navbar]
title = "🧠 LLM Stack"

[theme.navbar.logo]
alt = "LLM Stack Logo"
src = "img/logo.svg"

[[theme.navbar.items]]
label = "Documentation"
to = "/docs/intro/"

[[theme.navbar.items]]
label = "Blog"
to = "/blog/"

[[theme.navbar.items]]
label = "GitHub"
href = "https://github.com/mohamedaminehamdi/Isolated-Local-LLM-Deployment-Monitoring-Stack"
position = "right"

[theme.footer]
style = "dark"
copyright = "Copyright © {year} Isolated Local LLM Stack."

[[theme.footer.links]]
title = "Documentation"

[[theme.footer.links.items]]
label = "Getting Started"
to = "/docs/intro/"

[[theme.footer.links.items]]
label = "LLM Deployment"
to = "/docs/llm-deployment/"

[[theme.footer.links.items]]
label = "Monitoring Stack"
to = "/docs/monitoring/"

[[theme.footer.links]]
title = "Project"

[[theme.footer.links.items]]
label = "GitHub"
href = "https://github.com/mohamedaminehamdi/Isolated-Local-LLM-Deployment-Monitoring-Stack"

[[theme.footer.links.items]]
label = "Issues"
href = "https://github.com/mohamedaminehamdi/Isolated-Local-LLM-Deployment-Monitoring-Stack/issues"

[[theme.footer.links]]
title = "Stack Components"

[[theme.footer.links.items]]
label = "Ollama"
href = "https://ollama.ai/"

[[theme.footer.links.items]]
label = "Open WebUI"
href = "https://github.com/open-webui/open-webui"

[[theme.footer.links.items]]
label = "Prometheus"
href = "https://prometheus.io/"

[[theme.footer.links.items]]
label = "Grafana"
href = "https://grafana.com/"

[theme.highlight]
theme = "github"
dark_theme = "dracula"

[home]
hero = true

[home.primary_action]
label = "Get Started"
to = "/docs/intro/"

[home.secondary_action]
label = "Read the Blog"
to = "/blog/"

[build]
output = "dist"
static_dir = "static"
minify = true
"#;

const DEFAULT_SIDEBARS: &str = r#"# Docs sidebar order
docs = ["intro", "llm-deployment", "monitoring"]
"#;

const DEFAULT_INTRO: &str = r#"---
title: Getting Started
description: Deploy the stack in minutes
---

# Getting Started

This stack deploys a complete local LLM environment with Docker.

## Prerequisites

- Docker and Docker Compose
- 16 GB of RAM recommended for 7B models

## Quick Start

```bash
git clone https://github.com/mohamedaminehamdi/Isolated-Local-LLM-Deployment-Monitoring-Stack
cd Isolated-Local-LLM-Deployment-Monitoring-Stack
docker compose up -d
```

Open WebUI is then available on `http://localhost:3000`.

## Next Steps

- [LLM Deployment](llm-deployment.md) walks through model management.
- [Monitoring Stack](monitoring.md) covers the dashboards.
"#;

const DEFAULT_DEPLOYMENT: &str = r#"---
title: LLM Deployment
description: Running models with Ollama and Open WebUI
---

# LLM Deployment

Ollama serves models locally; Open WebUI provides the chat interface.

## Pulling a Model

```bash
docker exec -it ollama ollama pull llama3
```

## Network Isolation

All services run on an internal Docker network with no external
dependencies. Only the WebUI port is published to the host.
"#;

const DEFAULT_MONITORING: &str = r#"---
title: Monitoring Stack
description: Prometheus, Grafana, and exporters
---

# Monitoring Stack

The stack ships with Prometheus, Grafana, cAdvisor, and Node Exporter.

## Dashboards

Grafana is available on `http://localhost:3001` with preprovisioned
dashboards for container and host metrics.

## Alerting

Prometheus alert rules cover memory pressure and container restarts.
"#;

const DEFAULT_POST: &str = r#"---
title: Welcome
author: LLM Stack Team
description: The documentation site is live.
---

The documentation site for the Isolated Local LLM Stack is live.

Start with the [Getting Started](/docs/intro/) guide, and subscribe to
the [RSS feed](/blog/rss.xml) for updates.
"#;

const DEFAULT_CSS: &str = r#"/* Site-specific overrides, linked after the generated stylesheet. */

:root {
  --brand: #25c2a0;
}

.navbar a:hover {
  color: var(--brand);
}
"#;

const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 32 32" width="32" height="32">
  <circle cx="16" cy="16" r="14" fill="#25c2a0"/>
  <text x="16" y="21" font-size="14" text-anchor="middle" fill="#fff">P</text>
</svg>
"##;

const SOCIAL_CARD_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 1200 630" width="1200" height="630">
  <rect width="1200" height="630" fill="#1b1b1d"/>
  <text x="600" y="330" font-size="64" text-anchor="middle" fill="#25c2a0">Isolated Local LLM Stack</text>
</svg>
"##;

const FEATURE_DEPLOY_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 200" width="200" height="200">
  <rect x="40" y="60" width="120" height="80" rx="8" fill="#25c2a0"/>
  <polygon points="90,85 90,115 120,100" fill="#fff"/>
</svg>
"##;

const FEATURE_ISOLATION_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 200" width="200" height="200">
  <rect x="60" y="90" width="80" height="60" rx="8" fill="#25c2a0"/>
  <path d="M75 90 v-15 a25 25 0 0 1 50 0 v15" fill="none" stroke="#25c2a0" stroke-width="10"/>
</svg>
"##;

const FEATURE_MONITORING_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 200" width="200" height="200">
  <polyline points="40,140 80,100 110,120 160,60" fill="none" stroke="#25c2a0" stroke-width="10"/>
  <circle cx="160" cy="60" r="8" fill="#25c2a0"/>
</svg>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use portico_config::SiteConfig;

    #[test]
    fn scaffold_config_is_valid() {
        let config: SiteConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        let errors: Vec<_> = config
            .validate()
            .into_iter()
            .filter(|i| i.severity == portico_config::Severity::Error)
            .collect();

        assert!(errors.is_empty(), "scaffold config has errors: {:?}", errors);
        assert_eq!(config.site.title, "🧠 Isolated Local LLM Stack");
        assert_eq!(config.presets[0].name, "classic");
    }

    #[test]
    fn scaffold_sidebar_lists_all_docs() {
        #[derive(serde::Deserialize)]
        struct Sidebar {
            docs: Vec<String>,
        }

        let sidebar: Sidebar = toml::from_str(DEFAULT_SIDEBARS).unwrap();
        assert_eq!(sidebar.docs, ["intro", "llm-deployment", "monitoring"]);
    }
}
