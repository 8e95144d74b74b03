use crate::error::{Result, ShareIconsError};
use crate::networks::{Field, Network};
use notify::{RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Default configuration file name
pub const CONFIG_FILE: &str = "config.json5";

/// Color values accepted besides `#rgb` and `#rrggbb`
const COLOR_KEYWORDS: [&str; 3] = ["auto", "none", "transparent"];

/// Whether `value` is a hex color (`#rgb` or `#rrggbb`) or a color keyword.
///
/// Colors are written into a style element unescaped, so nothing else is let
/// through.
#[must_use]
pub fn is_valid_color(value: &str) -> bool {
    if COLOR_KEYWORDS.contains(&value) {
        return true;
    }
    value.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6) && hex.bytes().all(|b| b.is_ascii_hexdigit())
    })
}

/// Application configuration structure
///
/// Contains the site name used as the last title fallback and the settings of
/// the share block itself.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Name of the site, used when a page has no title of its own
    pub site_name: String,
    /// Settings of the share icons block
    pub block: BlockSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_name: "Share Icons".to_string(),
            block: BlockSettings::default(),
        }
    }
}

/// Everything the renderer needs to know about one block instance
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BlockSettings {
    pub layout: LayoutSettings,
    pub networks: Networks,
}

/// Direction in which the icons are laid out
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Icons in a row, sorted by their order key
    #[default]
    Horizontal,
    /// Icons in a column, in declaration order
    Vertical,
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Placement::Horizontal => f.write_str("horizontal"),
            Placement::Vertical => f.write_str("vertical"),
        }
    }
}

impl FromStr for Placement {
    type Err = ShareIconsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "horizontal" => Ok(Placement::Horizontal),
            "vertical" => Ok(Placement::Vertical),
            other => Err(ShareIconsError::from(format!(
                "Invalid icon placement: {other}"
            ))),
        }
    }
}

/// Global rendering dimensions and colors
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    pub placement: Placement,
    /// Width, height and line height of each icon
    pub icon_size_px: u32,
    pub font_size_px: u32,
    pub radius_px: u32,
    /// Right margin between icons
    pub spacing_px: u32,
    /// Background color of the icon links
    pub link_color: String,
    /// Foreground color of the icon glyphs
    pub icon_color: String,
    /// Ignore both colors and use white icons without a background
    pub use_default_style: bool,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            placement: Placement::Horizontal,
            icon_size_px: 38,
            font_size_px: 23,
            radius_px: 30,
            spacing_px: 8,
            link_color: "auto".to_string(),
            icon_color: "#ffffff".to_string(),
            use_default_style: true,
        }
    }
}

impl LayoutSettings {
    /// Icon color after the default style override is applied
    ///
    /// An invalid configured color is replaced by the default white.
    #[must_use]
    pub fn effective_icon_color(&self) -> &str {
        if self.use_default_style {
            "#ffffff"
        } else if is_valid_color(&self.icon_color) {
            &self.icon_color
        } else {
            warn!("Ignoring invalid icon color {:?}", self.icon_color);
            "#ffffff"
        }
    }

    /// Link background color after the default style override is applied
    ///
    /// An invalid configured color is replaced by `none`.
    #[must_use]
    pub fn effective_link_color(&self) -> &str {
        if self.use_default_style {
            "none"
        } else if is_valid_color(&self.link_color) {
            &self.link_color
        } else {
            warn!("Ignoring invalid link color {:?}", self.link_color);
            "none"
        }
    }
}

/// Settings of a single network
///
/// `suppressed` hides the icon. Older configurations call this flag `enable`
/// even though a true value has always hidden the icon; [`Config::load`]
/// renames it before deserializing.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NetworkSettings {
    pub suppressed: bool,
    /// Position in the horizontal layout, `None` means the network default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u8>,
    /// Tooltip shown when hovering the icon
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hover_text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub via: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subject: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
}

impl NetworkSettings {
    /// Value of an override field, empty when unset
    #[must_use]
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Url => &self.url,
            Field::Title => &self.title,
            Field::Via => &self.via,
            Field::Summary => &self.summary,
            Field::Source => &self.source,
            Field::ImageUrl => &self.image_url,
            Field::Description => &self.description,
            Field::Subject => &self.subject,
            Field::Body => &self.body,
        }
    }

    pub fn set_field(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Url => &mut self.url,
            Field::Title => &mut self.title,
            Field::Via => &mut self.via,
            Field::Summary => &mut self.summary,
            Field::Source => &mut self.source,
            Field::ImageUrl => &mut self.image_url,
            Field::Description => &mut self.description,
            Field::Subject => &mut self.subject,
            Field::Body => &mut self.body,
        };
        *slot = value;
    }

    /// Whether an override field holds a value
    #[must_use]
    pub fn has(&self, field: Field) -> bool {
        !self.field(field).is_empty()
    }
}

/// Per-network settings, one entry for each supported network
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Networks {
    pub reddit: NetworkSettings,
    pub tumblr: NetworkSettings,
    pub stumbleupon: NetworkSettings,
    pub twitter: NetworkSettings,
    pub linkedin: NetworkSettings,
    pub pinterest: NetworkSettings,
    pub email: NetworkSettings,
    pub facebook: NetworkSettings,
    pub googleplus: NetworkSettings,
}

impl Networks {
    #[must_use]
    pub fn get(&self, network: Network) -> &NetworkSettings {
        match network {
            Network::Reddit => &self.reddit,
            Network::Tumblr => &self.tumblr,
            Network::StumbleUpon => &self.stumbleupon,
            Network::Twitter => &self.twitter,
            Network::LinkedIn => &self.linkedin,
            Network::Pinterest => &self.pinterest,
            Network::Email => &self.email,
            Network::Facebook => &self.facebook,
            Network::GooglePlus => &self.googleplus,
        }
    }

    pub fn get_mut(&mut self, network: Network) -> &mut NetworkSettings {
        match network {
            Network::Reddit => &mut self.reddit,
            Network::Tumblr => &mut self.tumblr,
            Network::StumbleUpon => &mut self.stumbleupon,
            Network::Twitter => &mut self.twitter,
            Network::LinkedIn => &mut self.linkedin,
            Network::Pinterest => &mut self.pinterest,
            Network::Email => &mut self.email,
            Network::Facebook => &mut self.facebook,
            Network::GooglePlus => &mut self.googleplus,
        }
    }

    /// Order key of a network, falling back to its default position
    #[must_use]
    pub fn order(&self, network: Network) -> u8 {
        self.get(network)
            .order
            .unwrap_or_else(|| network.default_order())
    }
}

impl Config {
    /// Load the application configuration from a JSON5 file.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed, or
    /// if its top level is not an object
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let config_str = fs::read_to_string(path)?;

        let mut value: serde_json::Value = json5::from_str(&config_str)?;
        if !value.is_object() {
            return Err(ShareIconsError::Generic(
                "Config is not an object".to_string(),
            ));
        }
        rename_legacy_keys(&mut value);

        let config: Config = serde_json::from_value(value)?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load the configuration, using defaults when the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            info!(
                "No configuration found at {}, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Write the configuration to disk.
    ///
    /// JSON output is used because every JSON document is valid JSON5.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized or written
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        info!("Configuration written to {}", path.display());
        Ok(())
    }
}

/// Move the legacy `enable` flag of each network to `suppressed`. When a
/// network has both keys, `suppressed` wins.
fn rename_legacy_keys(value: &mut serde_json::Value) {
    let Some(networks) = value
        .pointer_mut("/block/networks")
        .and_then(serde_json::Value::as_object_mut)
    else {
        return;
    };

    for (name, settings) in networks.iter_mut() {
        let Some(settings) = settings.as_object_mut() else {
            continue;
        };
        let Some(enable) = settings.remove("enable") else {
            continue;
        };
        if settings.contains_key("suppressed") {
            warn!("{name} sets both `enable` and `suppressed`, using `suppressed`");
        } else {
            settings.insert("suppressed".to_string(), enable);
        }
    }
}

/// Watch the configuration file and reload the shared copy when it changes.
///
/// The watcher runs on a background task until `cancel_token` is cancelled. A
/// file that fails to parse is logged and the previous configuration stays in
/// place.
///
/// # Errors
///
/// Returns an error if the file watcher cannot be created or attached
pub fn watch(
    path: PathBuf,
    config: Arc<RwLock<Config>>,
    cancel_token: CancellationToken,
) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        // The receiver is gone once the watch task has stopped.
        let _ = tx.send(res);
    })?;
    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    info!("Watching configuration file {}", path.display());

    tokio::spawn(async move {
        let _watcher = watcher;
        loop {
            tokio::select! {
                () = cancel_token.cancelled() => break,
                Some(res) = rx.recv() => match res {
                    Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                        reload(&path, &config);
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Configuration watch error: {e}"),
                },
                else => break,
            }
        }
        debug!("Configuration watcher stopped");
    });

    Ok(())
}

fn reload(path: &Path, config: &RwLock<Config>) {
    match Config::load(path) {
        Ok(new_config) => match config.write() {
            Ok(mut guard) => {
                *guard = new_config;
                info!("Configuration reloaded");
            }
            Err(_) => error!("Failed to acquire config write lock for reload"),
        },
        Err(e) => warn!("Keeping previous configuration: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp config file");
        file.write_all(contents.as_bytes())
            .expect("Failed to write temp config file");
        file
    }

    #[test]
    fn test_layout_defaults() {
        let layout = LayoutSettings::default();
        assert_eq!(layout.placement, Placement::Horizontal);
        assert_eq!(layout.icon_size_px, 38);
        assert_eq!(layout.font_size_px, 23);
        assert_eq!(layout.radius_px, 30);
        assert_eq!(layout.spacing_px, 8);
        assert_eq!(layout.link_color, "auto");
        assert_eq!(layout.icon_color, "#ffffff");
        assert!(layout.use_default_style);
    }

    #[test]
    fn test_default_style_overrides_colors() {
        let mut layout = LayoutSettings {
            link_color: "#123456".to_string(),
            icon_color: "#abcdef".to_string(),
            ..LayoutSettings::default()
        };
        assert_eq!(layout.effective_icon_color(), "#ffffff");
        assert_eq!(layout.effective_link_color(), "none");

        layout.use_default_style = false;
        assert_eq!(layout.effective_icon_color(), "#abcdef");
        assert_eq!(layout.effective_link_color(), "#123456");
    }

    #[test]
    fn test_missing_order_uses_network_default() {
        let mut networks = Networks::default();
        networks.facebook.order = Some(2);

        assert_eq!(networks.order(Network::Facebook), 2);
        assert_eq!(networks.order(Network::GooglePlus), 9);
        assert_eq!(networks.order(Network::Reddit), 1);
    }

    #[test]
    fn test_placement_parsing() {
        assert_eq!("vertical".parse::<Placement>().ok(), Some(Placement::Vertical));
        assert_eq!(Placement::Horizontal.to_string(), "horizontal");
        let err = "diagonal".parse::<Placement>().unwrap_err();
        assert_eq!(err.to_string(), "Error: Invalid icon placement: diagonal");
    }

    #[test]
    fn test_load_partial_json5() {
        let file = write_config(
            r#"{
                // comments are fine in json5
                site_name: 'Blog',
                block: {
                    layout: { placement: 'vertical', spacing_px: 4 },
                    networks: {
                        reddit: { suppressed: true },
                        twitter: { via: 'rustlang', order: 1 },
                    },
                },
            }"#,
        );

        let config = Config::load(file.path()).expect("config should load");
        assert_eq!(config.site_name, "Blog");
        assert_eq!(config.block.layout.placement, Placement::Vertical);
        assert_eq!(config.block.layout.spacing_px, 4);
        assert_eq!(config.block.layout.icon_size_px, 38);
        assert!(config.block.networks.reddit.suppressed);
        assert_eq!(config.block.networks.twitter.via, "rustlang");
        assert_eq!(config.block.networks.order(Network::Twitter), 1);
        assert!(!config.block.networks.email.suppressed);
    }

    #[test]
    fn test_legacy_enable_key_suppresses() {
        let file = write_config("{ block: { networks: { pinterest: { enable: true } } } }");
        let config = Config::load(file.path()).expect("config should load");
        assert!(config.block.networks.pinterest.suppressed);
    }

    #[test]
    fn test_suppressed_wins_over_legacy_enable() {
        let file = write_config(
            "{ block: { networks: { pinterest: { enable: true, suppressed: false }, email: { enable: false } } } }",
        );
        let config = Config::load(file.path()).expect("config with both keys should load");
        assert!(!config.block.networks.pinterest.suppressed);
        assert!(!config.block.networks.email.suppressed);
    }

    #[test]
    fn test_color_values() {
        for valid in ["#fff", "#A0b1C2", "auto", "none", "transparent"] {
            assert!(is_valid_color(valid), "{valid}");
        }
        for invalid in ["", "red", "#ffff", "#gggggg", "#fff;}", "red}</style><script>"] {
            assert!(!is_valid_color(invalid), "{invalid}");
        }
    }

    #[test]
    fn test_invalid_configured_colors_fall_back() {
        let layout = LayoutSettings {
            link_color: "red}</style>".to_string(),
            icon_color: "url(x)".to_string(),
            use_default_style: false,
            ..LayoutSettings::default()
        };
        assert_eq!(layout.effective_icon_color(), "#ffffff");
        assert_eq!(layout.effective_link_color(), "none");
    }

    #[test]
    fn test_non_object_config_is_rejected() {
        let file = write_config("[1, 2, 3]");
        let err = Config::load(file.path()).unwrap_err();
        assert_eq!(err.to_string(), "Error: Config is not an object");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = Config::load_or_default(&dir.path().join("absent.json5"))
            .expect("defaults should load");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_saved_config_loads_back() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join(CONFIG_FILE);

        let mut config = Config::default();
        config.block.networks.email.subject = "Look at this".to_string();
        config.block.networks.linkedin.order = Some(3);
        config.save(&path).expect("config should save");

        assert_eq!(Config::load(&path).expect("config should load"), config);
    }
}
