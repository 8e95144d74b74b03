use crate::config::{self, Config, CONFIG_FILE};
use crate::error::{Result, ShareIconsError};
use crate::render::{render, RenderContext};
use crate::settings::{current_settings, generate_settings, save_settings};
use askama::Template;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tokio_util::sync::CancellationToken;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

/// Name of the client-side asset bundle holding the icon styles
pub const ASSET_BUNDLE: &str = "share_icons";

/// Shared state of the web host
pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub config_file_path: PathBuf,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, config_file_path: PathBuf) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            config_file_path,
        }
    }
}

/// Query parameters of the block endpoint
#[derive(Debug, Default, Deserialize)]
pub struct BlockQuery {
    /// Path of the page embedding the block
    pub path: Option<String>,
    /// Title of the route the page belongs to
    pub title: Option<String>,
    /// Title of the content item shown on the page
    pub item_title: Option<String>,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    site_name: String,
    asset_bundle: &'static str,
    share_block: String,
}

/// Host of the request, as sent in the `Host` header
#[must_use]
pub fn request_host(headers: &HeaderMap) -> String {
    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost")
        .to_string()
}

/// The block output embeds the request URL and title, so it is never cached.
fn uncached(html: String) -> Response {
    ([(header::CACHE_CONTROL, "max-age=0")], Html(html)).into_response()
}

fn read_config(state: &AppState) -> std::result::Result<Config, Response> {
    state.config.read().map(|guard| guard.clone()).map_err(|_| {
        error!("Configuration read lock error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Configuration read lock error",
        )
            .into_response()
    })
}

/// Renders the share block as an HTML fragment for the given page
pub async fn block_fragment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BlockQuery>,
) -> Response {
    let config = match read_config(&state) {
        Ok(config) => config,
        Err(response) => return response,
    };

    let ctx = RenderContext::resolve(
        &request_host(&headers),
        query.path.as_deref().unwrap_or("/"),
        query.title.as_deref(),
        query.item_title.as_deref(),
        &config.site_name,
    );

    match render(&config.block, &ctx) {
        Ok(block) => uncached(block.fragment()),
        Err(e) => {
            error!("Block rendering error: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Block rendering error").into_response()
        }
    }
}

/// Renders a demo page with the share block embedded
pub async fn generate_index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    tracing::debug!("Generating index template");
    let config = match read_config(&state) {
        Ok(config) => config,
        Err(response) => return response,
    };

    let ctx = RenderContext::resolve(&request_host(&headers), "/", None, None, &config.site_name);
    let page = render(&config.block, &ctx).and_then(|block| {
        IndexTemplate {
            site_name: config.site_name.clone(),
            asset_bundle: ASSET_BUNDLE,
            share_block: block.fragment(),
        }
        .render()
        .map_err(ShareIconsError::from)
    });

    match page {
        Ok(html) => uncached(html),
        Err(e) => {
            error!("Template rendering error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Template rendering error",
            )
                .into_response()
        }
    }
}

/// Build the application router around a shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(generate_index))
        .route("/block", get(block_fragment))
        .route("/settings", get(generate_settings).post(save_settings))
        .route("/api/settings", get(current_settings))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
}

/// Run the web server on the specified port.
///
/// # Arguments
///
/// * `port` - The port number to bind the server to
/// * `config_path` - Configuration file, `config.json5` when `None`
/// * `cancel_token` - Cancelling it shuts the server down gracefully
///
/// # Returns
///
/// Returns `Ok(())` if the server runs successfully, or a `ShareIconsError` if an error occurs
///
/// # Errors
///
/// Returns an error if:
/// - The configuration file exists but cannot be read or parsed
/// - The address string cannot be parsed into a valid `SocketAddr`
/// - The server fails to bind to the specified address
pub async fn run(
    port: u16,
    config_path: Option<PathBuf>,
    cancel_token: CancellationToken,
) -> Result<()> {
    tracing::info!("Initializing server");

    let config_file_path = config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let config = Config::load_or_default(&config_file_path)?;
    let state = Arc::new(AppState::new(config, config_file_path.clone()));

    if config_file_path.exists() {
        if let Err(e) = config::watch(
            config_file_path,
            state.config.clone(),
            cancel_token.clone(),
        ) {
            warn!("Configuration changes will not be picked up: {e}");
        }
    }

    let app = router(state);
    tracing::debug!("Routes configured");

    let addr = format!("0.0.0.0:{port}");
    let address: std::net::SocketAddr = addr.parse()?;
    info!("Binding server to address: {address}");

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|e| ShareIconsError::Generic(format!("Failed to bind {address}: {e}")))?;
    info!("Site launched on: http://{addr}");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel_token.cancelled().await })
        .await
    {
        return Err(ShareIconsError::Generic(format!("Server error: {e}")));
    }

    info!("Server shutdown complete");
    Ok(())
}
