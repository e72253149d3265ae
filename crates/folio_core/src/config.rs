//! Configuration system for folio
//!
//! Every field has a default, so an empty or missing file yields a working
//! site. Durations are stored as integer milliseconds.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    FolioError, Result, console::ConsoleConfig, feed::FeedConfig, fixtures::AssetSource,
    typing::{DEFAULT_ROLES, TypingConfig},
};

/// Resolve a path relative to a base directory
/// If the path is absolute, return it as-is
fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolioConfig {
    /// Owner and content sources
    #[serde(default)]
    pub site: SiteConfig,

    /// Hero line
    #[serde(default)]
    pub hero: HeroConfig,

    /// Simulated console and mascot
    #[serde(default)]
    pub console: ConsoleConfig,

    /// Repository feed
    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Display name shown in the hero
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Where experience.json and about.json live
    #[serde(default)]
    pub assets: AssetSource,

    /// Contact links, in display order
    #[serde(default = "default_contact")]
    pub contact: Vec<ContactLink>,
}

fn default_owner() -> String {
    "Hitesh".to_string()
}

fn default_contact() -> Vec<ContactLink> {
    [
        ("LinkedIn", "https://www.linkedin.com/in/hitesh-gupta-tr/"),
        ("GitHub", "https://github.com/hitesh-2457"),
        ("Email", "mailto:hiteshguptatr@outlook.com"),
    ]
    .into_iter()
    .map(|(label, url)| ContactLink {
        label: label.to_string(),
        url: url.to_string(),
    })
    .collect()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            assets: AssetSource::default(),
            contact: default_contact(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroConfig {
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,

    #[serde(default)]
    pub typing: TypingConfig,
}

fn default_roles() -> Vec<String> {
    DEFAULT_ROLES.iter().map(|r| r.to_string()).collect()
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            roles: default_roles(),
            typing: TypingConfig::default(),
        }
    }
}

/// Serde adapter storing a `Duration` as whole milliseconds
pub(crate) mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

// Utility functions

/// Load configuration from a TOML file
pub async fn load_config(path: &Path) -> Result<FolioConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| FolioError::config(path.display().to_string(), "file", "readable TOML file", e))?;

    let mut config: FolioConfig = toml::from_str(&content).map_err(|e| {
        FolioError::config(
            path.display().to_string(),
            "content",
            "valid TOML configuration",
            e,
        )
    })?;

    // Resolve the asset directory relative to the config file's directory
    let base_dir = path.parent().unwrap_or(Path::new("."));
    if let AssetSource::Directory { path: dir } = &mut config.site.assets {
        *dir = resolve_path(base_dir, dir);
    }

    Ok(config)
}

/// Save configuration to a TOML file
pub async fn save_config(config: &FolioConfig, path: &Path) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            FolioError::config(parent.display().to_string(), "directory", "writable directory", e)
        })?;
    }

    let content = toml::to_string_pretty(config).map_err(|e| {
        FolioError::config(
            path.display().to_string(),
            "serialization",
            "serializable config structure",
            e,
        )
    })?;

    tokio::fs::write(path, content)
        .await
        .map_err(|e| FolioError::config(path.display().to_string(), "file", "writable file location", e))?;

    Ok(())
}

/// Standard config file locations
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // Project-specific config
    paths.push(PathBuf::from("folio.toml"));

    // User config directory
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("folio").join("config.toml"));
    }

    // Home directory fallback
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".folio").join("config.toml"));
    }

    paths
}

/// Load configuration from standard locations
pub async fn load_config_from_standard_locations() -> Result<FolioConfig> {
    for path in config_paths() {
        if path.exists() {
            tracing::debug!("using config at {}", path.display());
            return load_config(&path).await;
        }
    }

    // No config found, return default
    Ok(FolioConfig::default())
}

impl FolioConfig {
    /// Load configuration from standard locations
    pub async fn load() -> Result<Self> {
        load_config_from_standard_locations().await
    }

    /// Load configuration from a specific file
    pub async fn load_from(path: &Path) -> Result<Self> {
        load_config(path).await
    }

    /// Save configuration to a specific file
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        save_config(self, path).await
    }
}
