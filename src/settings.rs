use crate::config::{is_valid_color, BlockSettings, Config, LayoutSettings, Networks, Placement};
use crate::error::{Result, ShareIconsError};
use crate::networks::{Field, Network};
use crate::render::{render, RenderContext};
use crate::server::{request_host, AppState};
use askama::Template;
use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{error, info, warn};
use url::Url;

/// Largest value accepted by the dimension sliders
pub const MAX_DIMENSION_PX: u32 = 100;

/// Flat settings record as submitted by the settings form
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SettingsUpdate {
    pub site_name: String,
    pub placement: String,
    pub icon_size_px: u32,
    pub font_size_px: u32,
    pub radius_px: u32,
    pub spacing_px: u32,
    pub link_color: String,
    pub icon_color: String,
    pub use_default_style: bool,
    pub networks: Vec<NetworkUpdate>,
}

/// Form values of one network
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NetworkUpdate {
    pub network: String,
    /// The "disable icon" checkbox
    #[serde(default)]
    pub disabled: bool,
    pub order: u8,
    #[serde(default)]
    pub hover_text: String,
    /// Override fields keyed by field name
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

/// Non-blocking notice that two networks share an order key
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct OrderWarning {
    /// Form field the warning is attached to, e.g. `twitter_icon_order`
    pub field: String,
    pub order: u8,
    pub message: String,
}

/// Response body of a successful save
#[derive(Debug, Deserialize, Serialize)]
pub struct SaveResponse {
    pub warnings: Vec<OrderWarning>,
}

impl SettingsUpdate {
    /// Form defaults for an existing configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let layout = &config.block.layout;
        let networks = &config.block.networks;

        Self {
            site_name: config.site_name.clone(),
            placement: layout.placement.to_string(),
            icon_size_px: layout.icon_size_px,
            font_size_px: layout.font_size_px,
            radius_px: layout.radius_px,
            spacing_px: layout.spacing_px,
            link_color: layout.link_color.clone(),
            icon_color: layout.icon_color.clone(),
            use_default_style: layout.use_default_style,
            networks: Network::ALL
                .into_iter()
                .map(|network| {
                    let settings = networks.get(network);
                    NetworkUpdate {
                        network: network.key().to_string(),
                        disabled: settings.suppressed,
                        order: networks.order(network),
                        hover_text: settings.hover_text.clone(),
                        fields: network
                            .fields()
                            .iter()
                            .map(|field| (field.key().to_string(), settings.field(*field).to_string()))
                            .collect(),
                    }
                })
                .collect(),
        }
    }

    /// Validates the settings update
    ///
    /// Duplicate order keys are not an error here, see
    /// [`duplicate_order_warnings`].
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        if self.site_name.trim().is_empty() {
            return Err(ShareIconsError::from("Site name cannot be empty"));
        }

        self.placement.parse::<Placement>()?;

        for (name, value) in [
            ("Icon size", self.icon_size_px),
            ("Font size", self.font_size_px),
            ("Radius", self.radius_px),
            ("Spacing", self.spacing_px),
        ] {
            if value > MAX_DIMENSION_PX {
                return Err(ShareIconsError::from(format!(
                    "{name} must be between 0 and {MAX_DIMENSION_PX}"
                )));
            }
        }

        for (name, value) in [("Link", &self.link_color), ("Icon", &self.icon_color)] {
            if !is_valid_color(value) {
                return Err(ShareIconsError::from(format!(
                    "{name} color must be a hex color or one of auto, none, transparent: {value}"
                )));
            }
        }

        let mut seen = HashSet::new();
        for update in &self.networks {
            let network = Network::from_key(&update.network).ok_or_else(|| {
                ShareIconsError::from(format!("Unknown network: {}", update.network))
            })?;
            if !seen.insert(network) {
                return Err(ShareIconsError::from(format!(
                    "Network listed twice: {network}"
                )));
            }
            update.validate(network)?;
        }

        Ok(())
    }

    /// Validate and convert the update into a configuration.
    ///
    /// Networks missing from the update keep their default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails
    pub fn into_config(self) -> Result<Config> {
        self.validate()?;

        let mut networks = Networks::default();
        for update in self.networks {
            let Some(network) = Network::from_key(&update.network) else {
                continue;
            };
            let settings = networks.get_mut(network);
            settings.suppressed = update.disabled;
            settings.order = Some(update.order);
            settings.hover_text = update.hover_text;
            for (key, value) in update.fields {
                if let Some(field) = Field::from_key(&key) {
                    settings.set_field(field, value);
                }
            }
        }

        Ok(Config {
            site_name: self.site_name,
            block: BlockSettings {
                layout: LayoutSettings {
                    placement: self.placement.parse()?,
                    icon_size_px: self.icon_size_px,
                    font_size_px: self.font_size_px,
                    radius_px: self.radius_px,
                    spacing_px: self.spacing_px,
                    link_color: self.link_color,
                    icon_color: self.icon_color,
                    use_default_style: self.use_default_style,
                },
                networks,
            },
        })
    }
}

impl NetworkUpdate {
    fn validate(&self, network: Network) -> Result<()> {
        if !(1..=9).contains(&self.order) {
            return Err(ShareIconsError::from(format!(
                "Order of {network} icon must be between 1 and 9"
            )));
        }

        for (key, value) in &self.fields {
            let field = Field::from_key(key)
                .filter(|field| network.fields().contains(field))
                .ok_or_else(|| {
                    ShareIconsError::from(format!("{network} does not accept field {key}"))
                })?;

            // Scheme-less values like "example.com/page" are allowed.
            if field.is_url() && value.contains("://") && Url::parse(value).is_err() {
                return Err(ShareIconsError::from(format!("Invalid URL format: {value}")));
            }
        }

        Ok(())
    }
}

/// One warning for every network whose order key was already taken by a
/// network declared before it.
#[must_use]
pub fn duplicate_order_warnings(networks: &Networks) -> Vec<OrderWarning> {
    let mut taken = HashSet::new();
    Network::ALL
        .into_iter()
        .filter_map(|network| {
            let order = networks.order(network);
            if taken.insert(order) {
                None
            } else {
                Some(OrderWarning {
                    field: format!("{}_icon_order", network.key()),
                    order,
                    message: format!("Order of {network} icon is the same as another icon"),
                })
            }
        })
        .collect()
}

struct FieldRow {
    name: &'static str,
    value: String,
}

struct OrderOption {
    value: u8,
    selected: bool,
}

struct NetworkRow {
    key: &'static str,
    label: &'static str,
    disabled: bool,
    order_options: Vec<OrderOption>,
    hover_text: String,
    fields: Vec<FieldRow>,
}

// Template structure for the settings page
#[derive(Template)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
    update: SettingsUpdate,
    rows: Vec<NetworkRow>,
    preview: String,
}

impl SettingsTemplate {
    fn new(config: &Config, preview: String) -> Self {
        let networks = &config.block.networks;
        let rows = Network::ALL
            .into_iter()
            .map(|network| {
                let settings = networks.get(network);
                let order = networks.order(network);
                NetworkRow {
                    key: network.key(),
                    label: network.label(),
                    disabled: settings.suppressed,
                    order_options: (1..=9)
                        .map(|value| OrderOption {
                            value,
                            selected: value == order,
                        })
                        .collect(),
                    hover_text: settings.hover_text.clone(),
                    fields: network
                        .fields()
                        .iter()
                        .map(|field| FieldRow {
                            name: field.key(),
                            value: settings.field(*field).to_string(),
                        })
                        .collect(),
                }
            })
            .collect();

        Self {
            update: SettingsUpdate::from_config(config),
            rows,
            preview,
        }
    }
}

/// Renders the settings page with a live preview of the block
///
/// # Returns
///
/// An HTML response with the settings page or an error response
pub async fn generate_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    tracing::debug!("Generating settings template");

    let config = match state.config.read() {
        Ok(config_guard) => config_guard.clone(),
        Err(_) => {
            error!("Configuration read lock error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration read lock error",
            )
                .into_response();
        }
    };

    let ctx = RenderContext::resolve(
        &request_host(&headers),
        "/",
        None,
        None,
        &config.site_name,
    );
    let rendered = match render(&config.block, &ctx) {
        Ok(block) => block.fragment(),
        Err(e) => {
            error!("Preview rendering error: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Preview rendering error").into_response();
        }
    };

    match SettingsTemplate::new(&config, rendered).render() {
        Ok(html) => Html(html).into_response(),
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

/// Returns the current settings as form values
pub async fn current_settings(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.config.read() {
        Ok(config) => Json(SettingsUpdate::from_config(&config)).into_response(),
        Err(_) => {
            error!("Configuration read lock error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration read lock error",
            )
                .into_response()
        }
    }
}

/// Validates and saves submitted settings
///
/// Invalid values are rejected with `400 Bad Request`. Duplicate order keys are
/// saved anyway and reported back as warnings.
pub async fn save_settings(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SettingsUpdate>,
) -> impl IntoResponse {
    info!("Saving settings");

    let config = match payload.into_config() {
        Ok(config) => config,
        Err(e) => {
            warn!("Rejected settings: {e}");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let warnings = duplicate_order_warnings(&config.block.networks);
    for warning in &warnings {
        warn!("{}: {}", warning.field, warning.message);
    }

    let result = (|| -> Result<()> {
        config.save(&state.config_file_path)?;

        let mut config_guard = state
            .config
            .write()
            .map_err(|_| ShareIconsError::from("Failed to acquire config write lock"))?;
        *config_guard = config;
        info!("Settings updated successfully in memory");
        Ok(())
    })();

    match result {
        Ok(()) => (StatusCode::OK, Json(SaveResponse { warnings })).into_response(),
        Err(e) => {
            error!("Error saving settings: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
