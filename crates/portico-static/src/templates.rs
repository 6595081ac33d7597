//! Template engine for rendering site pages.

use minijinja::{Environment, Value};

/// Site-wide template context, built once per build and shared by every page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SiteContext {
    /// Site title
    pub title: String,
    /// Site tagline
    pub tagline: String,
    /// `<html lang>` attribute
    pub lang: String,
    /// Base URL prefix for all generated hrefs
    pub base_url: String,
    /// Favicon URL
    pub favicon: Option<String>,
    /// `og:image` URL
    pub social_card: Option<String>,
    /// Stylesheet URLs, in link order
    pub styles: Vec<String>,
    /// Include the live-reload client script (dev builds only)
    pub live_reload: bool,
    pub navbar: NavbarContext,
    pub footer: FooterContext,
}

/// Navbar rendering context.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct NavbarContext {
    pub title: String,
    pub logo: Option<LogoContext>,
    pub left: Vec<LinkContext>,
    pub right: Vec<LinkContext>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct LogoContext {
    pub alt: String,
    pub src: String,
}

/// A resolved link: label plus final href.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LinkContext {
    pub label: String,
    pub url: String,
}

/// Footer rendering context.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct FooterContext {
    /// `dark` or `light`, used as a CSS class suffix
    pub style: String,
    /// Copyright line with `{year}` already substituted
    pub copyright: String,
    pub groups: Vec<FooterGroupContext>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct FooterGroupContext {
    pub title: String,
    pub items: Vec<LinkContext>,
}

/// A sidebar entry on docs pages.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SidebarEntry {
    pub title: String,
    pub url: String,
    pub active: bool,
}

/// A table of contents entry.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TocEntry {
    pub title: String,
    pub id: String,
    pub level: u8,
}

/// A post summary on the blog index.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PostSummary {
    pub title: String,
    pub url: String,
    /// Human-readable date, e.g. `June 15, 2025`
    pub date: String,
    pub author: Option<String>,
    pub description: Option<String>,
    /// Estimated minutes, when reading time is enabled
    pub reading_time: Option<u32>,
}

/// Prefix a site-relative path with the configured base URL.
pub fn join_base_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Escape a URL for an HTML attribute without entity-encoding `/`.
///
/// The default HTML auto-escape turns `/` into `&#x2f;`, which breaks
/// textual comparison of emitted hrefs against the output tree.
fn escape_href(url: String) -> Value {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Value::from_safe_string(out)
}

/// Template engine with the embedded page templates.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with all templates registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_filter("href", escape_href);

        for (name, source) in [
            ("layout.html", LAYOUT_TEMPLATE),
            ("navbar.html", NAVBAR_TEMPLATE),
            ("footer.html", FOOTER_TEMPLATE),
            ("home.html", HOME_TEMPLATE),
            ("features.html", FEATURES_TEMPLATE),
            ("doc.html", DOC_TEMPLATE),
            ("blog_index.html", BLOG_INDEX_TEMPLATE),
            ("post.html", POST_TEMPLATE),
        ] {
            env.add_template_owned(name.to_string(), source.to_string())
                .expect("embedded template is valid");
        }

        Self { env }
    }

    /// Render a registered template with the given context.
    pub fn render(&self, template: &str, ctx: Value) -> Result<String, minijinja::Error> {
        self.env.get_template(template)?.render(ctx)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const LAYOUT_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ site.lang }}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% block title %}{{ site.title }}{% endblock %}</title>
  {% if description %}<meta name="description" content="{{ description }}">
  {% endif %}{% if site.social_card %}<meta property="og:image" content="{{ site.social_card | href }}">
  {% endif %}{% if site.favicon %}<link rel="icon" href="{{ site.favicon | href }}">
  {% endif %}{% for style in site.styles %}<link rel="stylesheet" href="{{ style | href }}">
  {% endfor %}
</head>
<body>
  {% include "navbar.html" %}
  <main class="main">
    {% block content %}{% endblock %}
  </main>
  {% include "footer.html" %}
  {% if site.live_reload %}<script src="{{ site.base_url | href }}__reload.js"></script>
  {% endif %}
</body>
</html>"##;

const NAVBAR_TEMPLATE: &str = r##"<header class="navbar">
  <div class="navbar-inner">
    <a class="navbar-brand" href="{{ site.base_url | href }}">
      {% if site.navbar.logo %}<img class="navbar-logo" src="{{ site.navbar.logo.src | href }}" alt="{{ site.navbar.logo.alt }}">
      {% endif %}<span>{{ site.navbar.title }}</span>
    </a>
    <nav class="navbar-items">
      {% for item in site.navbar.left %}<a href="{{ item.url | href }}">{{ item.label }}</a>
      {% endfor %}
    </nav>
    <nav class="navbar-items navbar-right">
      {% for item in site.navbar.right %}<a href="{{ item.url | href }}">{{ item.label }}</a>
      {% endfor %}
    </nav>
  </div>
</header>"##;

const FOOTER_TEMPLATE: &str = r##"<footer class="footer footer-{{ site.footer.style }}">
  <div class="footer-groups">
    {% for group in site.footer.groups %}
    <div class="footer-group">
      <h4>{{ group.title }}</h4>
      <ul>
        {% for item in group.items %}<li><a href="{{ item.url | href }}">{{ item.label }}</a></li>
        {% endfor %}
      </ul>
    </div>
    {% endfor %}
  </div>
  {% if site.footer.copyright %}<div class="footer-copyright">{{ site.footer.copyright }}</div>
  {% endif %}
</footer>"##;

const HOME_TEMPLATE: &str = r##"{% extends "layout.html" %}

{% block content %}
{% if hero %}
<header class="hero">
  <h1 class="hero-title">{{ site.title }}</h1>
  <p class="hero-tagline">{{ site.tagline }}</p>
  <div class="hero-actions">
    {% if hero.primary %}<a class="button button-primary" href="{{ hero.primary.url | href }}">{{ hero.primary.label }}</a>
    {% endif %}{% if hero.secondary %}<a class="button button-secondary" href="{{ hero.secondary.url | href }}">{{ hero.secondary.label }}</a>
    {% endif %}
  </div>
</header>
{% endif %}
{{ features | safe }}
{% endblock %}"##;

const FEATURES_TEMPLATE: &str = r##"<section class="features">
  <div class="container">
    <div class="row">
      {% for feature in features %}
      <div class="feature-card">
        <div class="feature-image">
          <img src="{{ feature.image | href }}" alt="" role="img">
        </div>
        <h3>{{ feature.title }}</h3>
        <p>{{ feature.description | safe }}</p>
      </div>
      {% endfor %}
    </div>
  </div>
</section>"##;

const DOC_TEMPLATE: &str = r##"{% extends "layout.html" %}

{% block title %}{{ title }} | {{ site.title }}{% endblock %}

{% block content %}
<div class="doc-layout">
  <nav class="sidebar">
    <ul>
      {% for entry in sidebar %}<li{% if entry.active %} class="active"{% endif %}><a href="{{ entry.url | href }}">{{ entry.title }}</a></li>
      {% endfor %}
    </ul>
  </nav>
  <article class="doc-content">
    {{ content | safe }}
    {% if edit_url %}<a class="edit-link" href="{{ edit_url | href }}">Edit this page</a>
    {% endif %}
  </article>
  {% if toc %}
  <aside class="toc">
    <h2>On this page</h2>
    <ul>
      {% for entry in toc %}<li class="toc-level-{{ entry.level }}"><a href="#{{ entry.id }}">{{ entry.title }}</a></li>
      {% endfor %}
    </ul>
  </aside>
  {% endif %}
</div>
{% endblock %}"##;

const BLOG_INDEX_TEMPLATE: &str = r##"{% extends "layout.html" %}

{% block title %}Blog | {{ site.title }}{% endblock %}

{% block content %}
<div class="blog-index">
  <h1>Blog</h1>
  {% for post in posts %}
  <article class="blog-entry">
    <h2><a href="{{ post.url | href }}">{{ post.title }}</a></h2>
    <p class="post-meta">{{ post.date }}{% if post.author %} · {{ post.author }}{% endif %}{% if post.reading_time %} · {{ post.reading_time }} min read{% endif %}</p>
    {% if post.description %}<p>{{ post.description }}</p>
    {% endif %}
  </article>
  {% endfor %}
</div>
{% endblock %}"##;

const POST_TEMPLATE: &str = r##"{% extends "layout.html" %}

{% block title %}{{ title }} | {{ site.title }}{% endblock %}

{% block content %}
<article class="post">
  <h1>{{ title }}</h1>
  <p class="post-meta">{{ date }}{% if author %} · {{ author }}{% endif %}{% if reading_time %} · {{ reading_time }} min read{% endif %}</p>
  <div class="post-content">
    {{ content | safe }}
  </div>
  {% if edit_url %}<a class="edit-link" href="{{ edit_url | href }}">Edit this page</a>
  {% endif %}
</article>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    fn site() -> SiteContext {
        SiteContext {
            title: "LLM Stack".to_string(),
            tagline: "Deploy LLMs locally".to_string(),
            lang: "en".to_string(),
            base_url: "/".to_string(),
            favicon: None,
            social_card: None,
            styles: vec!["/assets/main.css".to_string()],
            live_reload: false,
            navbar: NavbarContext {
                title: "LLM Stack".to_string(),
                logo: None,
                left: vec![LinkContext {
                    label: "Documentation".to_string(),
                    url: "/docs/intro/".to_string(),
                }],
                right: vec![],
            },
            footer: FooterContext {
                style: "dark".to_string(),
                copyright: "Copyright © 2026 LLM Stack.".to_string(),
                groups: vec![],
            },
        }
    }

    #[test]
    fn renders_doc_page() {
        let engine = TemplateEngine::new();

        let html = engine
            .render(
                "doc.html",
                context! {
                    site => site(),
                    title => "Monitoring",
                    description => "Metrics",
                    content => "<p>Prometheus scrapes everything.</p>",
                    sidebar => vec![SidebarEntry {
                        title: "Monitoring".to_string(),
                        url: "/docs/monitoring/".to_string(),
                        active: true,
                    }],
                    toc => vec![TocEntry {
                        title: "Dashboards".to_string(),
                        id: "dashboards".to_string(),
                        level: 2,
                    }],
                    edit_url => Option::<String>::None,
                },
            )
            .unwrap();

        assert!(html.contains("<title>Monitoring | LLM Stack</title>"));
        assert!(html.contains("<p>Prometheus scrapes everything.</p>"));
        assert!(html.contains(r##"href="#dashboards""##));
        assert!(html.contains(r#"class="active""#));
        assert!(!html.contains("Edit this page"));
    }

    #[test]
    fn doc_page_includes_edit_link_when_configured() {
        let engine = TemplateEngine::new();

        let html = engine
            .render(
                "doc.html",
                context! {
                    site => site(),
                    title => "Intro",
                    content => "",
                    sidebar => Vec::<SidebarEntry>::new(),
                    toc => Vec::<TocEntry>::new(),
                    edit_url => "https://github.com/x/y/edit/main/docs/intro.md",
                },
            )
            .unwrap();

        assert!(html.contains("Edit this page"));
    }

    #[test]
    fn renders_navbar_and_footer_on_every_page() {
        let engine = TemplateEngine::new();

        let html = engine
            .render(
                "blog_index.html",
                context! {
                    site => site(),
                    posts => Vec::<PostSummary>::new(),
                },
            )
            .unwrap();

        assert!(html.contains("Documentation"));
        assert!(html.contains("footer-dark"));
        assert!(html.contains("Copyright © 2026 LLM Stack."));
    }

    #[test]
    fn live_reload_script_only_in_dev() {
        let engine = TemplateEngine::new();

        let mut dev_site = site();
        dev_site.live_reload = true;

        let dev = engine
            .render(
                "home.html",
                context! { site => dev_site, hero => false, features => "" },
            )
            .unwrap();
        let prod = engine
            .render(
                "home.html",
                context! { site => site(), hero => false, features => "" },
            )
            .unwrap();

        assert!(dev.contains("__reload.js"));
        assert!(!prod.contains("__reload.js"));
    }

    #[test]
    fn hrefs_keep_literal_slashes() {
        let engine = TemplateEngine::new();

        let html = engine
            .render(
                "blog_index.html",
                context! {
                    site => site(),
                    posts => Vec::<PostSummary>::new(),
                },
            )
            .unwrap();

        assert!(html.contains(r#"href="/docs/intro/""#));
        assert!(html.contains(r#"href="/assets/main.css""#));
        assert!(!html.contains("&#x2f;"));
    }

    #[test]
    fn href_escapes_attribute_breakers() {
        let escaped = escape_href(r#"/docs/"><script>"#.to_string());
        assert_eq!(
            escaped.as_str(),
            Some("/docs/&quot;&gt;&lt;script&gt;")
        );
    }

    #[test]
    fn join_base_url_handles_prefixes() {
        assert_eq!(join_base_url("/", "/docs/intro/"), "/docs/intro/");
        assert_eq!(
            join_base_url("/llm-stack/", "/docs/intro/"),
            "/llm-stack/docs/intro/"
        );
    }
}
