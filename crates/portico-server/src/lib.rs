//! Development server for portico.
//!
//! Watches the project tree, rebuilds into a scratch directory on change,
//! and pushes live-reload messages to connected browsers over a WebSocket.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{DevServer, DevServerConfig, ServerError};
pub use watcher::{SiteWatcher, WatchEvent};
pub use websocket::{reload_client_script, ReloadHub, ReloadMessage};
