//! Static site build command.

use std::path::PathBuf;

use anyhow::Result;

use portico_config::SiteConfig;
use portico_static::{BuildConfig, StaticBuilder};

/// Run the build command.
pub async fn run(
    config_path: PathBuf,
    output: Option<PathBuf>,
    minify: Option<bool>,
) -> Result<()> {
    tracing::info!("Building site from {}", config_path.display());

    let site = SiteConfig::load(&config_path)?;

    let root_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = BuildConfig {
        output_dir: output.unwrap_or_else(|| root_dir.join(&site.build.output)),
        minify: minify.unwrap_or(site.build.minify),
        live_reload: false,
        root_dir,
        site,
    };

    let result = StaticBuilder::new(config).build().await?;

    tracing::info!(
        "Built {} pages and {} posts in {}ms",
        result.pages,
        result.posts,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
