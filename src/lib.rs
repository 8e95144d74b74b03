//! # Share Icons Library
//!
//! This library renders a configurable block of social sharing icons (Reddit,
//! Tumblr, StumbleUpon, Twitter, LinkedIn, Pinterest, Email, Facebook and
//! Google+) for a web page, and ships a small web host that embeds the block,
//! serves its assets and edits its settings.
//!
//! ## Overview
//!
//! - `networks`: The supported networks and their share link tables
//! - `config`: Block settings, JSON5 loading and file watching
//! - `render`: Turns block settings and a page context into markup and style text
//! - `settings`: Settings form mapping, validation and the settings API
//! - `server`: Runs the web server and manages routes
//! - `error`: Defines custom error types for consistent error handling
//!
//! ## Rendering a block
//!
//! ```
//! use share_icons::config::BlockSettings;
//! use share_icons::render::{render, RenderContext};
//!
//! let ctx = RenderContext::new("example.com/page", "My Page");
//! let block = render(&BlockSettings::default(), &ctx).expect("block renders");
//!
//! assert!(block.markup.starts_with("<ul class=\"soc\">"));
//! assert!(block.style.contains("width: 38px;"));
//! ```
//!
//! ## Running the host
//!
//! ```no_run
//! use share_icons::{config::CONFIG_FILE, server};
//! use std::path::PathBuf;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), share_icons::error::ShareIconsError> {
//!     let cancel_token = CancellationToken::new();
//!     let config_path = Some(PathBuf::from(CONFIG_FILE));
//!
//!     server::run(3000, config_path, cancel_token).await
//! }
//! ```

/// Custom error types module
///
/// Defines the `ShareIconsError` enum and the crate-wide `Result` alias.
pub mod error;

/// Configuration management module
///
/// Handles loading block settings from a JSON5 file, saving them, and reloading
/// them when the file changes on disk.
pub mod config;

/// Share network definitions
///
/// Lists the supported networks in their fixed declaration order together with
/// their default order keys, CSS classes and link templates.
pub mod networks;

/// Icon renderer
pub mod render;

/// Settings page module
///
/// Maps between stored settings and the flat settings form, validates submitted
/// values and warns about duplicate order keys without blocking the save.
pub mod settings;

/// Server operations module
///
/// Contains the web server built on Axum: the demo page, the block fragment
/// endpoint, the settings routes and the static asset bundle.
pub mod server;
