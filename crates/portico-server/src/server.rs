//! Development server implementation.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::sync::RwLock;
use tower_http::services::ServeDir;

use portico_config::SiteConfig;
use portico_static::{BuildConfig, StaticBuilder};

use crate::watcher::{SiteWatcher, WatchEvent};
use crate::websocket::{reload_client_script, ReloadHub, ReloadMessage};

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Path to `portico.toml`
    pub config_path: PathBuf,

    /// Project root; source directories resolve against it
    pub root_dir: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("portico.toml"),
            root_dir: PathBuf::from("."),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind to {0}: {1}")]
    Bind(SocketAddr, String),

    #[error("Invalid address {0}: {1}")]
    Address(String, String),

    #[error("File watch error: {0}")]
    Watch(String),

    #[error("Config error: {0}")]
    Config(#[from] portico_config::ConfigError),

    #[error("Build error: {0}")]
    Build(#[from] portico_static::BuildError),
}

/// Shared server state.
struct ServerState {
    config: DevServerConfig,
    site: SiteConfig,
    hub: ReloadHub,
    output_dir: PathBuf,
}

/// Development server: builds into a scratch directory, serves it, and
/// rebuilds on file changes.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Start the development server. Runs until the process exits.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr_str = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = addr_str
            .parse()
            .map_err(|e: std::net::AddrParseError| ServerError::Address(addr_str, e.to_string()))?;

        let site = SiteConfig::load(&self.config.config_path)?;
        let output_dir = self.config.root_dir.join(".portico").join("dev");
        let base_url = site.site.base_url.clone();

        // Initial build must succeed; later rebuilds keep the last good
        // output on failure.
        rebuild(&self.config, &site, &output_dir).await?;

        let watch_paths = watch_paths(&self.config, &site);
        let (watcher, mut rx) =
            SiteWatcher::new(&watch_paths).map_err(|e| ServerError::Watch(e.to_string()))?;

        let state = Arc::new(RwLock::new(ServerState {
            config: self.config.clone(),
            site,
            hub: ReloadHub::new(),
            output_dir: output_dir.clone(),
        }));

        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&state_clone, event).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = build_router(Arc::clone(&state), &base_url, &output_dir);

        tracing::info!("Dev server running at http://{}{}", addr, base_url);

        if self.config.open {
            let url = format!("http://{}{}", addr, base_url);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Bind(addr, e.to_string()))?;

        Ok(())
    }
}

/// Paths to watch: sources, config, and the theme stylesheet.
fn watch_paths(config: &DevServerConfig, site: &SiteConfig) -> Vec<PathBuf> {
    let preset = site.resolved_preset();
    let mut paths = vec![
        config.config_path.clone(),
        config.root_dir.join(&preset.docs.dir),
        config.root_dir.join(&preset.blog.dir),
        config.root_dir.join(&site.build.static_dir),
    ];
    if let Some(sidebar) = &preset.docs.sidebar {
        paths.push(config.root_dir.join(sidebar));
    }
    if let Some(css) = &preset.theme.custom_css {
        paths.push(config.root_dir.join(css));
    }
    paths
}

/// Build the router: reload endpoints plus the static output tree.
///
/// Pages rendered under a non-root base URL load the reload script from
/// `{base_url}__reload.js`, so those endpoints exist under the base path as
/// well as at the root.
fn build_router(state: Arc<RwLock<ServerState>>, base_url: &str, output_dir: &Path) -> Router {
    let serve_dir = ServeDir::new(output_dir);
    let base = base_url.trim_end_matches('/');

    let mut app = Router::new()
        .route("/__reload", get(ws_handler))
        .route("/__reload.js", get(reload_script_handler));
    if !base.is_empty() {
        app = app
            .route(&format!("{base}/__reload"), get(ws_handler))
            .route(&format!("{base}/__reload.js"), get(reload_script_handler));
    }

    let app = app.with_state(state);
    if base.is_empty() {
        app.fallback_service(serve_dir)
    } else {
        app.nest_service(base, serve_dir)
    }
}

/// Run a dev build with live reload enabled.
async fn rebuild(
    config: &DevServerConfig,
    site: &SiteConfig,
    output_dir: &Path,
) -> Result<portico_static::BuildResult, portico_static::BuildError> {
    let builder = StaticBuilder::new(BuildConfig {
        site: site.clone(),
        root_dir: config.root_dir.clone(),
        output_dir: output_dir.to_path_buf(),
        minify: false,
        live_reload: true,
    });
    builder.build().await
}

/// Handle file watch events: rebuild, then tell browsers to reload.
async fn handle_watch_event(state: &Arc<RwLock<ServerState>>, event: WatchEvent) {
    // Config changes require reloading portico.toml before rebuilding.
    if let WatchEvent::ConfigChanged(path) = &event {
        tracing::info!("Config changed: {}", path.display());
        let config_path = state.read().await.config.config_path.clone();
        match SiteConfig::load(&config_path) {
            Ok(site) => state.write().await.site = site,
            Err(e) => {
                tracing::error!("Config reload failed, keeping previous config: {}", e);
                return;
            }
        }
    } else {
        let path = match &event {
            WatchEvent::ContentChanged(p)
            | WatchEvent::StyleChanged(p)
            | WatchEvent::Created(p)
            | WatchEvent::Deleted(p)
            | WatchEvent::Modified(p) => p,
            WatchEvent::ConfigChanged(_) => unreachable!(),
        };
        tracing::info!("Changed: {}", path.display());
    }

    let state = state.read().await;
    match rebuild(&state.config, &state.site, &state.output_dir).await {
        Ok(result) => {
            tracing::info!(
                "Rebuilt {} pages, {} posts in {}ms",
                result.pages,
                result.posts,
                result.duration_ms
            );
            state.hub.send(ReloadMessage::Reload);
        }
        Err(e) => {
            // Last good build stays served until the next successful one.
            tracing::error!("Rebuild failed: {}", e);
        }
    }
}

/// Handler for the reload WebSocket endpoint.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<RwLock<ServerState>>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: Arc<RwLock<ServerState>>) {
    let mut rx = {
        let state = state.read().await;
        state.hub.subscribe()
    };

    let Ok(msg) = serde_json::to_string(&ReloadMessage::Connected) else {
        return;
    };
    if socket.send(Message::Text(msg.into())).await.is_err() {
        return;
    }

    while let Ok(reload_msg) = rx.recv().await {
        let Ok(json) = serde_json::to_string(&reload_msg) else {
            break;
        };
        if socket.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }
}

/// Handler for the reload client script.
async fn reload_script_handler(
    State(state): State<Arc<RwLock<ServerState>>>,
) -> impl IntoResponse {
    let state = state.read().await;
    let ws_url = format!(
        "ws://{}:{}/__reload",
        state.config.host, state.config.port
    );
    (
        [("content-type", "application/javascript")],
        reload_client_script(&ws_url),
    )
}
