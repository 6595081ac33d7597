//! Static site builder.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use minijinja::context;
use rayon::prelude::*;
use walkdir::WalkDir;

use portico_config::{FeedKind, LinkPolicy, NavbarPosition, ResolvedPreset, SiteConfig};
use portico_markdown::date::current_utc_year;
use portico_markdown::{parse_page, reading_time, render_html, Date, ParsedPage};

use crate::assets::AssetPipeline;
use crate::feed::{build_atom, build_rss, FeedEntry};
use crate::home::{FeatureGrid, Hero};
use crate::templates::{
    join_base_url, FooterContext, FooterGroupContext, LinkContext, LogoContext, NavbarContext,
    PostSummary, SidebarEntry, SiteContext, TemplateEngine, TocEntry,
};

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Loaded site configuration
    pub site: SiteConfig,

    /// Project root; source directories resolve against it
    pub root_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify emitted CSS
    pub minify: bool,

    /// Include the live-reload client script (dev builds)
    pub live_reload: bool,
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of docs pages generated (homepage included)
    pub pages: usize,

    /// Number of blog posts generated
    pub posts: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read source: {0}")]
    Read(String),

    #[error("Failed to parse page: {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Failed to render template: {0}")]
    Template(String),

    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Broken links:{}", .0.iter().map(|l| format!("\n  {}", l)).collect::<String>())]
    BrokenLinks(Vec<String>),
}

/// A docs page ready for rendering.
#[derive(Debug)]
struct DocPage {
    source_path: PathBuf,
    slug: String,
    /// Site-relative route, e.g. `/docs/intro/`
    route: String,
    page: ParsedPage,
}

/// A blog post ready for rendering.
#[derive(Debug)]
struct BlogPost {
    source_path: PathBuf,
    slug: String,
    route: String,
    date: Date,
    page: ParsedPage,
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    preset: ResolvedPreset,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        let preset = config.site.resolved_preset();
        Self {
            config,
            preset,
            templates: TemplateEngine::new(),
        }
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::Write(e.to_string()))?;

        let docs = self.discover_docs()?;
        let posts = self.discover_posts()?;

        // Route lookup for rewriting relative *.md links, keyed by file stem.
        let mut md_routes: HashMap<String, String> = HashMap::new();
        for doc in &docs {
            if let Some(stem) = doc.source_path.file_stem().and_then(|s| s.to_str()) {
                md_routes.insert(format!("{}.md", stem), doc.route.clone());
            }
        }
        for post in &posts {
            if let Some(name) = post.source_path.file_name().and_then(|n| n.to_str()) {
                md_routes.insert(name.to_string(), post.route.clone());
            }
        }

        let site = self.site_context();
        let broken_md_links: Mutex<Vec<String>> = Mutex::new(Vec::new());

        // Docs pages render in parallel; each render is pure given its page.
        docs.par_iter()
            .map(|doc| self.build_doc(doc, &docs, &site, &md_routes, &broken_md_links))
            .collect::<Result<Vec<()>, BuildError>>()?;

        self.build_home(&site)?;

        if !posts.is_empty() {
            self.build_blog_index(&posts, &site)?;
            posts
                .par_iter()
                .map(|post| self.build_post(post, &site, &md_routes, &broken_md_links))
                .collect::<Result<Vec<()>, BuildError>>()?;
            self.generate_feeds(&posts)?;
        }

        self.apply_link_policy(
            self.config.site.links.on_broken_markdown,
            broken_md_links.into_inner().unwrap_or_default(),
            "markdown link",
        )?;

        self.generate_assets()?;
        self.copy_static_dir()?;
        self.generate_search_index(&docs, &posts)?;
        self.generate_sitemap(&docs, &posts)?;
        self.check_links()?;

        let duration = start.elapsed();

        Ok(BuildResult {
            // Docs pages plus homepage plus the blog index when present
            pages: docs.len() + 1 + usize::from(!posts.is_empty()),
            posts: posts.len(),
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Discover docs pages and apply the sidebar ordering.
    fn discover_docs(&self) -> Result<Vec<DocPage>, BuildError> {
        let docs_dir = self.config.root_dir.join(&self.preset.docs.dir);

        if !docs_dir.exists() {
            return Err(BuildError::Read(format!(
                "Docs directory not found: {}",
                docs_dir.display()
            )));
        }

        let mut docs = Vec::new();

        for entry in WalkDir::new(&docs_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }

            let content = fs::read_to_string(path)
                .map_err(|e| BuildError::Read(format!("{}: {}", path.display(), e)))?;
            let page = parse_page(&content).map_err(|e| BuildError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("untitled")
                .to_string();
            let slug = page
                .frontmatter
                .as_ref()
                .and_then(|f| f.slug.clone())
                .unwrap_or(stem);

            docs.push(DocPage {
                source_path: path.to_path_buf(),
                route: format!("/docs/{}/", slug),
                slug,
                page,
            });
        }

        self.order_docs(&mut docs);
        Ok(docs)
    }

    /// Order docs by the sidebar file when configured, else by frontmatter
    /// `order` then slug.
    fn order_docs(&self, docs: &mut [DocPage]) {
        if let Some(sidebar_path) = &self.preset.docs.sidebar {
            let path = self.config.root_dir.join(sidebar_path);
            match load_sidebar_order(&path) {
                Some(order) => {
                    let rank: HashMap<&str, usize> = order
                        .iter()
                        .enumerate()
                        .map(|(i, slug)| (slug.as_str(), i))
                        .collect();

                    for doc in docs.iter() {
                        if !rank.contains_key(doc.slug.as_str()) {
                            tracing::warn!(
                                "Page '{}' is not listed in {}",
                                doc.slug,
                                path.display()
                            );
                        }
                    }

                    docs.sort_by_key(|d| {
                        rank.get(d.slug.as_str()).copied().unwrap_or(usize::MAX)
                    });
                    return;
                }
                None => {
                    tracing::warn!(
                        "Sidebar file {} missing or invalid; falling back to frontmatter order",
                        path.display()
                    );
                }
            }
        }

        docs.sort_by(|a, b| {
            let order_a = a.page.frontmatter.as_ref().and_then(|f| f.order);
            let order_b = b.page.frontmatter.as_ref().and_then(|f| f.order);
            order_a
                .unwrap_or(i32::MAX)
                .cmp(&order_b.unwrap_or(i32::MAX))
                .then_with(|| a.slug.cmp(&b.slug))
        });
    }

    /// Discover blog posts; date comes from a `YYYY-MM-DD-slug.md` filename
    /// or frontmatter. Sorted newest first.
    fn discover_posts(&self) -> Result<Vec<BlogPost>, BuildError> {
        let blog_dir = self.config.root_dir.join(&self.preset.blog.dir);

        if !blog_dir.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&blog_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }

            let content = fs::read_to_string(path)
                .map_err(|e| BuildError::Read(format!("{}: {}", path.display(), e)))?;
            let page = parse_page(&content).map_err(|e| BuildError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("untitled");

            let (filename_date, filename_slug) = split_dated_filename(stem);
            let date = page
                .frontmatter
                .as_ref()
                .and_then(|f| f.date)
                .or(filename_date)
                .ok_or_else(|| BuildError::Parse {
                    path: path.display().to_string(),
                    message: "blog post needs a date (frontmatter or YYYY-MM-DD-slug.md filename)"
                        .to_string(),
                })?;

            let slug = page
                .frontmatter
                .as_ref()
                .and_then(|f| f.slug.clone())
                .unwrap_or_else(|| filename_slug.to_string());

            posts.push(BlogPost {
                source_path: path.to_path_buf(),
                route: format!("/blog/{}/", slug),
                slug,
                date,
                page,
            });
        }

        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
        Ok(posts)
    }

    /// Site-wide template context, shared by every page of this build.
    fn site_context(&self) -> SiteContext {
        let site = &self.config.site;
        let base_url = &site.site.base_url;

        let mut left = Vec::new();
        let mut right = Vec::new();
        for item in &site.theme.navbar.items {
            let url = match (&item.to, &item.href) {
                (Some(to), _) => join_base_url(base_url, to),
                (None, Some(href)) => href.clone(),
                (None, None) => continue,
            };
            let link = LinkContext {
                label: item.label.clone(),
                url,
            };
            match item.position {
                NavbarPosition::Left => left.push(link),
                NavbarPosition::Right => right.push(link),
            }
        }

        let groups = site
            .theme
            .footer
            .links
            .iter()
            .map(|group| FooterGroupContext {
                title: group.title.clone(),
                items: group
                    .items
                    .iter()
                    .filter_map(|item| {
                        let url = match (&item.to, &item.href) {
                            (Some(to), _) => join_base_url(base_url, to),
                            (None, Some(href)) => href.clone(),
                            (None, None) => return None,
                        };
                        Some(LinkContext {
                            label: item.label.clone(),
                            url,
                        })
                    })
                    .collect(),
            })
            .collect();

        let navbar_title = if site.theme.navbar.title.is_empty() {
            site.site.title.clone()
        } else {
            site.theme.navbar.title.clone()
        };

        let mut styles = vec![join_base_url(base_url, "/assets/main.css")];
        if self.preset.theme.custom_css.is_some() {
            styles.push(join_base_url(base_url, "/assets/custom.css"));
        }

        let footer_style = match site.theme.footer.style {
            portico_config::FooterStyle::Dark => "dark",
            portico_config::FooterStyle::Light => "light",
        };

        SiteContext {
            title: site.site.title.clone(),
            tagline: site.site.tagline.clone(),
            lang: site.i18n.default_locale.clone(),
            base_url: base_url.clone(),
            favicon: site
                .site
                .favicon
                .as_ref()
                .map(|f| join_base_url(base_url, &format!("/{}", f))),
            social_card: site
                .theme
                .social_card
                .as_ref()
                .map(|c| join_base_url(base_url, &format!("/{}", c))),
            styles,
            live_reload: self.config.live_reload,
            navbar: NavbarContext {
                title: navbar_title,
                logo: site.theme.navbar.logo.as_ref().map(|l| LogoContext {
                    alt: l.alt.clone(),
                    src: join_base_url(base_url, &format!("/{}", l.src)),
                }),
                left,
                right,
            },
            footer: FooterContext {
                style: footer_style.to_string(),
                copyright: site
                    .theme
                    .footer
                    .copyright_for_year(current_utc_year()),
                groups,
            },
        }
    }

    /// Render page content, rewriting relative markdown links and recording
    /// the ones that resolve to no page.
    fn render_content(
        &self,
        source_path: &Path,
        content: &str,
        md_routes: &HashMap<String, String>,
        broken: &Mutex<Vec<String>>,
    ) -> String {
        let base_url = &self.config.site.site.base_url;

        render_html(content, |dest| {
            let (path, fragment) = match dest.split_once('#') {
                Some((p, f)) => (p, Some(f)),
                None => (dest, None),
            };
            let key = Path::new(path.trim_start_matches("./"))
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(path);

            match md_routes.get(key) {
                Some(route) => {
                    let mut url = join_base_url(base_url, route);
                    if let Some(fragment) = fragment {
                        url.push('#');
                        url.push_str(fragment);
                    }
                    Some(url)
                }
                None => {
                    if let Ok(mut list) = broken.lock() {
                        list.push(format!("{} -> {}", source_path.display(), dest));
                    }
                    None
                }
            }
        })
    }

    fn build_doc(
        &self,
        doc: &DocPage,
        all_docs: &[DocPage],
        site: &SiteContext,
        md_routes: &HashMap<String, String>,
        broken: &Mutex<Vec<String>>,
    ) -> Result<(), BuildError> {
        let content = self.render_content(&doc.source_path, &doc.page.content, md_routes, broken);

        let sidebar: Vec<SidebarEntry> = all_docs
            .iter()
            .filter(|d| d.page.frontmatter.as_ref().map(|f| f.nav).unwrap_or(true))
            .map(|d| SidebarEntry {
                title: d
                    .page
                    .frontmatter
                    .as_ref()
                    .map(|f| f.title.clone())
                    .unwrap_or_else(|| d.slug.clone()),
                url: join_base_url(&site.base_url, &d.route),
                active: d.slug == doc.slug,
            })
            .collect();

        let toc: Vec<TocEntry> = doc
            .page
            .toc
            .iter()
            .map(|e| TocEntry {
                title: e.title.clone(),
                id: e.id.clone(),
                level: e.level,
            })
            .collect();

        let title = doc
            .page
            .frontmatter
            .as_ref()
            .map(|f| f.title.clone())
            .unwrap_or_else(|| doc.slug.clone());
        let description = doc
            .page
            .frontmatter
            .as_ref()
            .and_then(|f| f.description.clone());

        let edit_url = self.preset.docs.edit_url.as_ref().and_then(|prefix| {
            doc.source_path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|name| format!("{}{}", prefix, name))
        });

        let html = self
            .templates
            .render(
                "doc.html",
                context! {
                    site => site,
                    title => title,
                    description => description,
                    content => content,
                    sidebar => sidebar,
                    toc => toc,
                    edit_url => edit_url,
                },
            )
            .map_err(|e| BuildError::Template(e.to_string()))?;

        self.write_route(&doc.route, &html)
    }

    /// Render the homepage: hero plus feature grid.
    fn build_home(&self, site: &SiteContext) -> Result<(), BuildError> {
        let home = &self.config.site.home;

        let features = FeatureGrid::from_config(home)
            .render(&self.templates, &site.base_url)
            .map_err(|e| BuildError::Template(e.to_string()))?;
        let hero = Hero::from_config(home, &site.base_url);

        let html = self
            .templates
            .render(
                "home.html",
                context! {
                    site => site,
                    description => site.tagline,
                    hero => hero,
                    features => features,
                },
            )
            .map_err(|e| BuildError::Template(e.to_string()))?;

        self.write_route("/", &html)
    }

    fn build_blog_index(
        &self,
        posts: &[BlogPost],
        site: &SiteContext,
    ) -> Result<(), BuildError> {
        let summaries: Vec<PostSummary> = posts
            .iter()
            .map(|post| self.post_summary(post, site))
            .collect();

        let html = self
            .templates
            .render(
                "blog_index.html",
                context! {
                    site => site,
                    posts => summaries,
                },
            )
            .map_err(|e| BuildError::Template(e.to_string()))?;

        self.write_route("/blog/", &html)
    }

    fn post_summary(&self, post: &BlogPost, site: &SiteContext) -> PostSummary {
        let fm = post.page.frontmatter.as_ref();
        PostSummary {
            title: fm
                .map(|f| f.title.clone())
                .unwrap_or_else(|| post.slug.clone()),
            url: join_base_url(&site.base_url, &post.route),
            date: post.date.to_string(),
            author: fm.and_then(|f| f.author.clone()),
            description: fm.and_then(|f| f.description.clone()),
            reading_time: self
                .preset
                .blog
                .reading_time
                .then(|| reading_time(&post.page.content)),
        }
    }

    fn build_post(
        &self,
        post: &BlogPost,
        site: &SiteContext,
        md_routes: &HashMap<String, String>,
        broken: &Mutex<Vec<String>>,
    ) -> Result<(), BuildError> {
        let content =
            self.render_content(&post.source_path, &post.page.content, md_routes, broken);
        let summary = self.post_summary(post, site);

        let edit_url = self.preset.blog.edit_url.as_ref().and_then(|prefix| {
            post.source_path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|name| format!("{}{}", prefix, name))
        });

        let html = self
            .templates
            .render(
                "post.html",
                context! {
                    site => site,
                    title => summary.title,
                    description => summary.description,
                    date => summary.date,
                    author => summary.author,
                    reading_time => summary.reading_time,
                    content => content,
                    edit_url => edit_url,
                },
            )
            .map_err(|e| BuildError::Template(e.to_string()))?;

        self.write_route(&post.route, &html)
    }

    /// Write a rendered page under `route` as `index.html`.
    fn write_route(&self, route: &str, html: &str) -> Result<(), BuildError> {
        let dir = self
            .config
            .output_dir
            .join(route.trim_start_matches('/'));
        fs::create_dir_all(&dir).map_err(|e| BuildError::Write(e.to_string()))?;
        fs::write(dir.join("index.html"), html).map_err(|e| BuildError::Write(e.to_string()))
    }

    /// Emit the stylesheet(s).
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::Write(e.to_string()))?;

        let css = AssetPipeline::generate_css(&self.config.site.theme.highlight);
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or(css)
        } else {
            css
        };
        fs::write(assets_dir.join("main.css"), css)
            .map_err(|e| BuildError::Write(e.to_string()))?;

        if let Some(custom) = &self.preset.theme.custom_css {
            let source = self.config.root_dir.join(custom);
            if source.exists() {
                let content = fs::read_to_string(&source)
                    .map_err(|e| BuildError::Read(format!("{}: {}", source.display(), e)))?;
                let content = if self.config.minify {
                    AssetPipeline::minify_css(&content).unwrap_or(content)
                } else {
                    content
                };
                fs::write(assets_dir.join("custom.css"), content)
                    .map_err(|e| BuildError::Write(e.to_string()))?;
            } else {
                tracing::warn!("Custom stylesheet not found: {}", source.display());
            }
        }

        Ok(())
    }

    /// Copy the static directory verbatim into the output root.
    fn copy_static_dir(&self) -> Result<(), BuildError> {
        let static_dir = self.config.root_dir.join(&self.config.site.build.static_dir);
        if !static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(&static_dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let relative = path.strip_prefix(&static_dir).unwrap_or(path);
            let target = self.config.output_dir.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| BuildError::Write(e.to_string()))?;
            }
            fs::copy(path, &target).map_err(|e| BuildError::Write(e.to_string()))?;
        }

        Ok(())
    }

    /// Emit the configured feeds under `/blog/`.
    fn generate_feeds(&self, posts: &[BlogPost]) -> Result<(), BuildError> {
        if self.preset.blog.feeds.is_empty() {
            return Ok(());
        }

        let site = &self.config.site;
        let site_url = site.site.url.trim_end_matches('/');
        let entries: Vec<FeedEntry> = posts
            .iter()
            .map(|post| {
                let fm = post.page.frontmatter.as_ref();
                FeedEntry {
                    title: fm
                        .map(|f| f.title.clone())
                        .unwrap_or_else(|| post.slug.clone()),
                    url: format!(
                        "{}{}",
                        site_url,
                        join_base_url(&site.site.base_url, &post.route)
                    ),
                    date: post.date,
                    author: fm.and_then(|f| f.author.clone()),
                    description: fm.and_then(|f| f.description.clone()),
                }
            })
            .collect();

        let blog_dir = self.config.output_dir.join("blog");
        fs::create_dir_all(&blog_dir).map_err(|e| BuildError::Write(e.to_string()))?;

        for kind in &self.preset.blog.feeds {
            let (name, xml) = match kind {
                FeedKind::Rss => ("rss.xml", build_rss(site, &entries)),
                FeedKind::Atom => ("atom.xml", build_atom(site, &entries)),
            };
            fs::write(blog_dir.join(name), xml)
                .map_err(|e| BuildError::Write(e.to_string()))?;
        }

        Ok(())
    }

    /// Emit `search-index.json` with one record per page.
    fn generate_search_index(
        &self,
        docs: &[DocPage],
        posts: &[BlogPost],
    ) -> Result<(), BuildError> {
        let base_url = &self.config.site.site.base_url;

        let record = |fm: Option<&portico_markdown::Frontmatter>,
                      slug: &str,
                      route: &str,
                      content: &str| {
            let excerpt = content
                .lines()
                .filter(|l| !l.starts_with('#') && !l.starts_with("```"))
                .take(10)
                .collect::<Vec<_>>()
                .join(" ");

            serde_json::json!({
                "title": fm.map(|f| f.title.clone()).unwrap_or_else(|| slug.to_string()),
                "description": fm.and_then(|f| f.description.clone()).unwrap_or_default(),
                "url": join_base_url(base_url, route),
                "content": excerpt,
            })
        };

        let index: Vec<serde_json::Value> = docs
            .iter()
            .map(|d| {
                record(
                    d.page.frontmatter.as_ref(),
                    &d.slug,
                    &d.route,
                    &d.page.content,
                )
            })
            .chain(posts.iter().map(|p| {
                record(
                    p.page.frontmatter.as_ref(),
                    &p.slug,
                    &p.route,
                    &p.page.content,
                )
            }))
            .collect();

        let json = serde_json::to_string_pretty(&index)
            .map_err(|e| BuildError::Write(e.to_string()))?;

        fs::write(self.config.output_dir.join("search-index.json"), json)
            .map_err(|e| BuildError::Write(e.to_string()))
    }

    /// Emit `sitemap.xml` and `robots.txt`.
    fn generate_sitemap(&self, docs: &[DocPage], posts: &[BlogPost]) -> Result<(), BuildError> {
        let site = &self.config.site;
        let site_url = site.site.url.trim_end_matches('/');

        let mut routes = vec!["/".to_string()];
        routes.extend(docs.iter().map(|d| d.route.clone()));
        if !posts.is_empty() {
            routes.push("/blog/".to_string());
            routes.extend(posts.iter().map(|p| p.route.clone()));
        }

        let urls: Vec<String> = routes
            .iter()
            .map(|route| {
                format!(
                    "  <url>\n    <loc>{}{}</loc>\n  </url>",
                    site_url,
                    join_base_url(&site.site.base_url, route)
                )
            })
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        fs::write(self.config.output_dir.join("sitemap.xml"), sitemap)
            .map_err(|e| BuildError::Write(e.to_string()))?;

        let robots = format!(
            "User-agent: *\nAllow: /\nSitemap: {}{}sitemap.xml",
            site_url, site.site.base_url
        );
        fs::write(self.config.output_dir.join("robots.txt"), robots)
            .map_err(|e| BuildError::Write(e.to_string()))
    }

    /// Collect internal hrefs from the emitted HTML and verify each one
    /// resolves to a generated file.
    fn check_links(&self) -> Result<(), BuildError> {
        let policy = self.config.site.links.on_broken;
        if policy == LinkPolicy::Ignore {
            return Ok(());
        }

        let href_re = regex::Regex::new(r#"href="([^"]+)""#).expect("valid regex");
        let base_url = &self.config.site.site.base_url;
        let mut broken: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for entry in WalkDir::new(&self.config.output_dir)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("html") {
                continue;
            }
            let html = fs::read_to_string(path)
                .map_err(|e| BuildError::Read(format!("{}: {}", path.display(), e)))?;

            for capture in href_re.captures_iter(&html) {
                let href = &capture[1];
                if href.contains("://") || href.starts_with('#') || href.starts_with("mailto:") {
                    continue;
                }

                let target = href.split(['#', '?']).next().unwrap_or(href);
                let relative = target
                    .strip_prefix(base_url.as_str())
                    .or_else(|| target.strip_prefix('/'))
                    .unwrap_or(target);

                if !seen.insert(relative.to_string()) {
                    continue;
                }

                if !self.output_path_exists(relative) {
                    broken.push(format!("{} -> {}", path.display(), href));
                }
            }
        }

        self.apply_link_policy(policy, broken, "link")
    }

    /// A target exists when it is a file, or a directory with an index.html.
    fn output_path_exists(&self, relative: &str) -> bool {
        if relative.is_empty() {
            return true;
        }
        let candidate = self.config.output_dir.join(relative);
        candidate.is_file() || candidate.join("index.html").is_file()
    }

    fn apply_link_policy(
        &self,
        policy: LinkPolicy,
        broken: Vec<String>,
        what: &str,
    ) -> Result<(), BuildError> {
        if broken.is_empty() {
            return Ok(());
        }

        match policy {
            LinkPolicy::Error => Err(BuildError::BrokenLinks(broken)),
            LinkPolicy::Warn => {
                for link in broken {
                    tracing::warn!("Broken {}: {}", what, link);
                }
                Ok(())
            }
            LinkPolicy::Ignore => Ok(()),
        }
    }
}

/// Sidebar ordering file: `docs = ["intro", "deployment", ...]`.
fn load_sidebar_order(path: &Path) -> Option<Vec<String>> {
    #[derive(serde::Deserialize)]
    struct SidebarFile {
        docs: Vec<String>,
    }

    let content = fs::read_to_string(path).ok()?;
    let file: SidebarFile = toml::from_str(&content).ok()?;
    Some(file.docs)
}

/// Split a `YYYY-MM-DD-slug` file stem into date and slug.
fn split_dated_filename(stem: &str) -> (Option<Date>, &str) {
    if stem.len() > 11 && stem.as_bytes()[10] == b'-' {
        if let Some(date) = stem.get(..10).and_then(Date::parse) {
            return (Some(date), &stem[11..]);
        }
    }
    (None, stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_file(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site_toml() -> &'static str {
        r#"
[site]
title = "Isolated Local LLM Stack"
tagline = "Deploy LLMs locally with Docker"
url = "https://example.github.io"
base_url = "/"

[links]
on_broken = "warn"

[[presets]]
name = "classic"

[presets.docs]
sidebar = "sidebars.toml"

[[theme.navbar.items]]
label = "Documentation"
to = "/docs/intro/"

[theme.footer]
copyright = "Copyright © {year} LLM Stack."
"#
    }

    fn scaffold(root: &Path) {
        write_file(
            &root.join("docs/intro.md"),
            "---\ntitle: Getting Started\n---\n\n# Getting Started\n\nSee [monitoring](monitoring.md).\n",
        );
        write_file(
            &root.join("docs/monitoring.md"),
            "---\ntitle: Monitoring\n---\n\n# Monitoring\n\n## Dashboards\n",
        );
        write_file(&root.join("sidebars.toml"), "docs = [\"intro\", \"monitoring\"]\n");
        write_file(
            &root.join("blog/2025-06-15-first-release.md"),
            "---\ntitle: First Release\nauthor: amine\ndescription: The stack is out.\n---\n\nThe stack ships today.\n",
        );
    }

    fn build_config(root: &Path, toml_str: &str) -> BuildConfig {
        let site: SiteConfig = toml::from_str(toml_str).unwrap();
        BuildConfig {
            site,
            root_dir: root.to_path_buf(),
            output_dir: root.join("dist"),
            minify: false,
            live_reload: false,
        }
    }

    #[tokio::test]
    async fn builds_a_complete_site() {
        let temp = tempdir().unwrap();
        scaffold(temp.path());

        let builder = StaticBuilder::new(build_config(temp.path(), site_toml()));
        let result = builder.build().await.unwrap();

        assert_eq!(result.posts, 1);
        // two docs + homepage + blog index
        assert_eq!(result.pages, 4);

        let out = temp.path().join("dist");
        assert!(out.join("index.html").is_file());
        assert!(out.join("docs/intro/index.html").is_file());
        assert!(out.join("docs/monitoring/index.html").is_file());
        assert!(out.join("blog/index.html").is_file());
        assert!(out.join("blog/first-release/index.html").is_file());
        assert!(out.join("blog/rss.xml").is_file());
        assert!(out.join("blog/atom.xml").is_file());
        assert!(out.join("sitemap.xml").is_file());
        assert!(out.join("robots.txt").is_file());
        assert!(out.join("search-index.json").is_file());
        assert!(out.join("assets/main.css").is_file());
    }

    #[tokio::test]
    async fn homepage_renders_hero_and_feature_cards() {
        let temp = tempdir().unwrap();
        scaffold(temp.path());

        let builder = StaticBuilder::new(build_config(temp.path(), site_toml()));
        builder.build().await.unwrap();

        let home = fs::read_to_string(temp.path().join("dist/index.html")).unwrap();

        assert!(home.contains("Isolated Local LLM Stack"));
        assert!(home.contains("Deploy LLMs locally with Docker"));
        assert_eq!(home.matches("feature-card").count(), 3);

        let deploy = home.find("🚀 One-Command Deploy").unwrap();
        let isolation = home.find("🔒 Network Isolation").unwrap();
        let monitoring = home.find("📊 Real-time Monitoring").unwrap();
        assert!(deploy < isolation && isolation < monitoring);
    }

    #[tokio::test]
    async fn rebuild_is_idempotent() {
        let temp = tempdir().unwrap();
        scaffold(temp.path());

        let builder = StaticBuilder::new(build_config(temp.path(), site_toml()));
        builder.build().await.unwrap();
        let first = fs::read_to_string(temp.path().join("dist/index.html")).unwrap();

        builder.build().await.unwrap();
        let second = fs::read_to_string(temp.path().join("dist/index.html")).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn sidebar_order_follows_the_sidebar_file() {
        let temp = tempdir().unwrap();
        scaffold(temp.path());
        // The sidebar file puts intro before monitoring even though the
        // fallback slug order would agree; flip it to prove the file wins.
        write_file(
            &temp.path().join("sidebars.toml"),
            "docs = [\"monitoring\", \"intro\"]\n",
        );

        let builder = StaticBuilder::new(build_config(temp.path(), site_toml()));
        builder.build().await.unwrap();

        let page = fs::read_to_string(temp.path().join("dist/docs/intro/index.html")).unwrap();
        let monitoring = page.find(">Monitoring</a>").unwrap();
        let intro = page.find(">Getting Started</a>").unwrap();
        assert!(monitoring < intro);
    }

    #[tokio::test]
    async fn markdown_links_are_rewritten_to_routes() {
        let temp = tempdir().unwrap();
        scaffold(temp.path());

        let builder = StaticBuilder::new(build_config(temp.path(), site_toml()));
        builder.build().await.unwrap();

        let intro = fs::read_to_string(temp.path().join("dist/docs/intro/index.html")).unwrap();
        assert!(intro.contains(r#"href="/docs/monitoring/""#));
    }

    #[tokio::test]
    async fn broken_internal_links_fail_the_build_under_error_policy() {
        let temp = tempdir().unwrap();
        scaffold(temp.path());
        write_file(
            &temp.path().join("docs/broken.md"),
            "---\ntitle: Broken\n---\n\n[dead](/docs/nowhere/)\n",
        );

        let toml_str = site_toml().replace("on_broken = \"warn\"", "on_broken = \"error\"");
        let builder = StaticBuilder::new(build_config(temp.path(), &toml_str));

        let err = builder.build().await.unwrap_err();
        assert!(matches!(err, BuildError::BrokenLinks(_)));
    }

    #[tokio::test]
    async fn valid_site_passes_the_error_policy() {
        let temp = tempdir().unwrap();
        scaffold(temp.path());

        // Navbar, footer, sidebar, and stylesheet links all come out of
        // templates; none of them may trip the checker.
        let toml_str = site_toml().replace("on_broken = \"warn\"", "on_broken = \"error\"");
        let builder = StaticBuilder::new(build_config(temp.path(), &toml_str));

        builder.build().await.unwrap();

        let home = fs::read_to_string(temp.path().join("dist/index.html")).unwrap();
        assert!(home.contains(r#"href="/assets/main.css""#));
        assert!(!home.contains("&#x2f;"));
    }

    #[tokio::test]
    async fn footer_copyright_substitutes_the_year() {
        let temp = tempdir().unwrap();
        scaffold(temp.path());

        let builder = StaticBuilder::new(build_config(temp.path(), site_toml()));
        builder.build().await.unwrap();

        let home = fs::read_to_string(temp.path().join("dist/index.html")).unwrap();
        assert!(!home.contains("{year}"));
        assert!(home.contains("LLM Stack."));
    }

    #[tokio::test]
    async fn base_url_prefixes_generated_hrefs() {
        let temp = tempdir().unwrap();
        scaffold(temp.path());

        let toml_str = site_toml().replace(
            "base_url = \"/\"",
            "base_url = \"/llm-stack/\"",
        );
        let builder = StaticBuilder::new(build_config(temp.path(), &toml_str));
        builder.build().await.unwrap();

        let home = fs::read_to_string(temp.path().join("dist/index.html")).unwrap();
        assert!(home.contains(r#"href="/llm-stack/docs/intro/""#));
        assert!(home.contains(r#"href="/llm-stack/assets/main.css""#));
    }

    #[tokio::test]
    async fn missing_docs_dir_is_a_read_error() {
        let temp = tempdir().unwrap();

        let builder = StaticBuilder::new(build_config(temp.path(), site_toml()));
        let err = builder.build().await.unwrap_err();

        assert!(matches!(err, BuildError::Read(_)));
    }

    #[test]
    fn splits_dated_filenames() {
        let (date, slug) = split_dated_filename("2025-06-15-first-release");
        assert_eq!(date, Date::parse("2025-06-15"));
        assert_eq!(slug, "first-release");

        let (date, slug) = split_dated_filename("no-date-here");
        assert!(date.is_none());
        assert_eq!(slug, "no-date-here");
    }
}
