//! Static site builder for portico.
//!
//! Turns a project directory (docs, blog, static assets) plus a loaded
//! `portico.toml` into a tree of HTML pages, stylesheets, feeds, and
//! supporting files ready to serve from any static host.

pub mod assets;
pub mod builder;
pub mod feed;
pub mod home;
pub mod templates;

pub use assets::AssetPipeline;
pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use feed::{build_atom, build_rss, FeedEntry};
pub use home::{FeatureGrid, FeatureItem, Hero};
pub use templates::{join_base_url, SiteContext, TemplateEngine};
