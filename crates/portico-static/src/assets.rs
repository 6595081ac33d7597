//! Asset pipeline: default stylesheet, highlight palettes, CSS minification.

use portico_config::HighlightConfig;

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the site stylesheet: base layout plus the two selected
    /// highlight palettes as CSS variable sets.
    pub fn generate_css(highlight: &HighlightConfig) -> String {
        let light = highlight_palette(&highlight.theme).unwrap_or(GITHUB_PALETTE);
        let dark = highlight_palette(&highlight.dark_theme).unwrap_or(DRACULA_PALETTE);

        format!(
            ":root {{\n{}}}\n\n@media (prefers-color-scheme: dark) {{\n  :root {{\n{}  }}\n}}\n\n{}",
            light, dark, BASE_CSS
        )
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

/// CSS variable block for a named highlight palette.
pub fn highlight_palette(name: &str) -> Option<&'static str> {
    match name {
        "github" => Some(GITHUB_PALETTE),
        "dracula" => Some(DRACULA_PALETTE),
        "nord" => Some(NORD_PALETTE),
        "one-dark" => Some(ONE_DARK_PALETTE),
        _ => None,
    }
}

const GITHUB_PALETTE: &str =
    "  --code-bg: #f6f8fa;\n  --code-fg: #24292e;\n  --code-border: #d0d7de;\n";

const DRACULA_PALETTE: &str =
    "  --code-bg: #282a36;\n  --code-fg: #f8f8f2;\n  --code-border: #44475a;\n";

const NORD_PALETTE: &str =
    "  --code-bg: #2e3440;\n  --code-fg: #d8dee9;\n  --code-border: #4c566a;\n";

const ONE_DARK_PALETTE: &str =
    "  --code-bg: #282c34;\n  --code-fg: #abb2bf;\n  --code-border: #3e4451;\n";

const BASE_CSS: &str = r#"/* portico base theme */

:root {
  --content-max-width: 900px;
  --sidebar-width: 260px;
  --toc-width: 200px;
  --fg: #1c1e21;
  --fg-muted: #606770;
  --bg: #ffffff;
  --bg-muted: #f5f6f7;
  --border: #dadde1;
  --primary: #2e8555;
  --primary-dark: #205d3b;
  --footer-dark-bg: #303846;
  --footer-dark-fg: #ebedf0;
  --radius: 0.4rem;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--bg);
  color: var(--fg);
  line-height: 1.65;
}

/* Navbar */
.navbar {
  border-bottom: 1px solid var(--border);
  box-shadow: 0 1px 2px rgba(0, 0, 0, 0.06);
}

.navbar-inner {
  display: flex;
  align-items: center;
  gap: 1.5rem;
  max-width: 1300px;
  margin: 0 auto;
  padding: 0.75rem 1.5rem;
}

.navbar-brand {
  display: flex;
  align-items: center;
  gap: 0.5rem;
  font-weight: 700;
  color: var(--fg);
  text-decoration: none;
}

.navbar-logo {
  height: 2rem;
  width: 2rem;
}

.navbar-items {
  display: flex;
  gap: 1rem;
}

.navbar-items a {
  color: var(--fg);
  text-decoration: none;
}

.navbar-items a:hover {
  color: var(--primary);
}

.navbar-right {
  margin-left: auto;
}

/* Hero */
.hero {
  background: var(--primary);
  color: #ffffff;
  text-align: center;
  padding: 4rem 1.5rem;
}

.hero-title {
  font-size: 3rem;
}

.hero-tagline {
  font-size: 1.3rem;
  margin-top: 0.5rem;
}

.hero-actions {
  display: flex;
  justify-content: center;
  gap: 1rem;
  margin-top: 2rem;
}

.button {
  display: inline-block;
  padding: 0.75rem 1.5rem;
  border-radius: var(--radius);
  font-weight: 600;
  text-decoration: none;
}

.button-primary {
  background: #ffffff;
  color: var(--primary-dark);
}

.button-secondary {
  border: 1px solid #ffffff;
  color: #ffffff;
}

/* Feature grid */
.features {
  padding: 3rem 1.5rem;
}

.features .container {
  max-width: 1140px;
  margin: 0 auto;
}

.features .row {
  display: flex;
  flex-wrap: wrap;
  gap: 2rem;
  justify-content: center;
}

.feature-card {
  flex: 1 1 280px;
  max-width: 360px;
  text-align: center;
}

.feature-image img {
  height: 10rem;
  width: 10rem;
}

.feature-card h3 {
  margin: 1rem 0 0.5rem;
}

.feature-card p {
  color: var(--fg-muted);
}

/* Docs layout */
.doc-layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) minmax(0, 1fr) var(--toc-width);
  gap: 2rem;
  max-width: 1300px;
  margin: 0 auto;
  padding: 2rem 1.5rem;
}

.sidebar ul {
  list-style: none;
  position: sticky;
  top: 1rem;
}

.sidebar a {
  display: block;
  padding: 0.4rem 0.75rem;
  color: var(--fg-muted);
  text-decoration: none;
  border-radius: var(--radius);
}

.sidebar a:hover {
  background: var(--bg-muted);
  color: var(--fg);
}

.sidebar .active a {
  color: var(--primary);
  font-weight: 600;
}

.doc-content {
  max-width: var(--content-max-width);
}

.doc-content h1 {
  font-size: 2.25rem;
  margin-bottom: 1rem;
}

.doc-content h2 {
  margin: 2rem 0 0.75rem;
  padding-bottom: 0.4rem;
  border-bottom: 1px solid var(--border);
}

.doc-content h3 {
  margin: 1.5rem 0 0.5rem;
}

.doc-content p,
.doc-content ul,
.doc-content ol {
  margin-bottom: 1rem;
}

.doc-content ul,
.doc-content ol {
  padding-left: 1.5rem;
}

.doc-content a {
  color: var(--primary);
}

.doc-content table {
  border-collapse: collapse;
  margin-bottom: 1rem;
}

.doc-content th,
.doc-content td {
  border: 1px solid var(--border);
  padding: 0.4rem 0.75rem;
}

/* Code */
pre {
  background: var(--code-bg);
  color: var(--code-fg);
  border: 1px solid var(--code-border);
  border-radius: var(--radius);
  padding: 1rem;
  overflow-x: auto;
  font-size: 0.9rem;
  margin-bottom: 1rem;
}

code {
  font-family: ui-monospace, monospace;
  font-size: 0.9em;
  background: var(--code-bg);
  color: var(--code-fg);
  padding: 0.1rem 0.3rem;
  border-radius: 0.25rem;
}

pre code {
  background: none;
  padding: 0;
}

/* TOC */
.toc {
  position: sticky;
  top: 1rem;
  align-self: start;
  font-size: 0.875rem;
}

.toc h2 {
  font-size: 0.75rem;
  text-transform: uppercase;
  letter-spacing: 0.05em;
  color: var(--fg-muted);
  margin-bottom: 0.5rem;
}

.toc ul {
  list-style: none;
}

.toc a {
  color: var(--fg-muted);
  text-decoration: none;
}

.toc a:hover {
  color: var(--fg);
}

.toc-level-3 {
  padding-left: 1rem;
}

.edit-link {
  display: inline-block;
  margin-top: 2rem;
  color: var(--primary);
}

/* Blog */
.blog-index,
.post {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 2rem 1.5rem;
}

.blog-entry {
  margin-top: 2rem;
}

.blog-entry h2 a {
  color: var(--fg);
  text-decoration: none;
}

.blog-entry h2 a:hover {
  color: var(--primary);
}

.post-meta {
  color: var(--fg-muted);
  font-size: 0.875rem;
  margin: 0.25rem 0 1rem;
}

.post-content p {
  margin-bottom: 1rem;
}

/* Footer */
.footer {
  margin-top: 3rem;
  padding: 2rem 1.5rem;
}

.footer-dark {
  background: var(--footer-dark-bg);
  color: var(--footer-dark-fg);
}

.footer-dark a {
  color: var(--footer-dark-fg);
}

.footer-light {
  background: var(--bg-muted);
  color: var(--fg);
}

.footer-light a {
  color: var(--fg);
}

.footer-groups {
  display: flex;
  flex-wrap: wrap;
  gap: 3rem;
  max-width: 1140px;
  margin: 0 auto;
}

.footer-group h4 {
  margin-bottom: 0.5rem;
}

.footer-group ul {
  list-style: none;
}

.footer-copyright {
  text-align: center;
  margin-top: 2rem;
  font-size: 0.875rem;
}

/* Responsive */
@media (max-width: 996px) {
  .doc-layout {
    grid-template-columns: 1fr;
  }

  .toc {
    display: none;
  }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_css_with_selected_palettes() {
        let highlight = HighlightConfig {
            theme: "github".to_string(),
            dark_theme: "nord".to_string(),
        };

        let css = AssetPipeline::generate_css(&highlight);

        assert!(css.contains("#f6f8fa"));
        assert!(css.contains("#2e3440"));
        assert!(css.contains(".feature-card"));
        assert!(css.contains(".footer-dark"));
    }

    #[test]
    fn every_known_theme_has_a_palette() {
        for name in portico_config::HIGHLIGHT_THEMES {
            assert!(
                highlight_palette(name).is_some(),
                "missing palette: {}",
                name
            );
        }
        assert!(highlight_palette("solarized").is_none());
    }

    #[test]
    fn minifies_css() {
        let css = r#"
.button {
    background-color: blue;
    padding: 10px;
}
        "#;

        let minified = AssetPipeline::minify_css(css).unwrap();

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".button"));
    }

    #[test]
    fn generated_css_survives_minification() {
        let css = AssetPipeline::generate_css(&HighlightConfig::default());

        let minified = AssetPipeline::minify_css(&css).unwrap();
        assert!(minified.len() < css.len());
    }
}
