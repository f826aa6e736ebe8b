use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, ShopscoutError};
use crate::types::PriceRange;

/// Top-level configuration for the Shopscout client.
///
/// Loaded from `~/.shopscout/config.toml` by default. Every section is
/// optional and falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopscoutConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl ShopscoutConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ShopscoutConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ShopscoutError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Backend endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL hosting `/search` and `/chat`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 15,
        }
    }
}

/// Search trigger and filter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before a typed query is committed, in milliseconds.
    pub debounce_ms: u64,
    /// Minimum committed query length (in characters) that issues a search.
    pub min_query_chars: usize,
    /// Lowest value of the price slider.
    pub price_floor: u64,
    /// Highest value of the price slider.
    pub price_ceiling: u64,
    /// Slider granularity.
    pub price_step: u64,
}

impl SearchConfig {
    /// The initial price filter: the whole slider.
    pub fn default_price_range(&self) -> PriceRange {
        PriceRange::new(self.price_floor, self.price_ceiling)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 400,
            min_query_chars: 2,
            price_floor: 0,
            price_ceiling: 300_000,
            price_step: 1_000,
        }
    }
}

/// Assistant chat settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Assistant turn seeded at the start of every session.
    pub greeting: String,
    /// Assistant turn appended when a chat request fails.
    pub fallback_reply: String,
    /// Messages longer than this are not sent.
    pub max_message_chars: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: "Namaste! I'm your AI Product Expert. Need a recommendation or have \
                       questions about specs? Just ask!"
                .to_string(),
            fallback_reply: "Apologies! My brain is a bit fuzzy right now.".to_string(),
            max_message_chars: 2_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = ShopscoutConfig::default();

        assert_eq!(config.general.log_level, "info");

        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.api.timeout_secs, 15);

        assert_eq!(config.search.debounce_ms, 400);
        assert_eq!(config.search.min_query_chars, 2);
        assert_eq!(config.search.price_floor, 0);
        assert_eq!(config.search.price_ceiling, 300_000);
        assert_eq!(config.search.price_step, 1_000);
        assert_eq!(
            config.search.default_price_range(),
            PriceRange::new(0, 300_000)
        );

        assert!(config.chat.greeting.starts_with("Namaste!"));
        assert!(config.chat.fallback_reply.starts_with("Apologies!"));
        assert_eq!(config.chat.max_message_chars, 2_000);
    }

    #[test]
    fn test_config_partial_toml_keeps_defaults() {
        let toml_str = r#"
[api]
base_url = "https://shop.example.com"

[search]
debounce_ms = 250
"#;
        let config: ShopscoutConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.base_url, "https://shop.example.com");
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.search.debounce_ms, 250);
        assert_eq!(config.search.min_query_chars, 2);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_config_empty_toml_is_default() {
        let config: ShopscoutConfig = toml::from_str("").unwrap();
        assert_eq!(config.search.price_ceiling, 300_000);
        assert_eq!(config.chat.max_message_chars, 2_000);
    }

    #[test]
    fn test_config_load_or_default_missing_file() {
        let config = ShopscoutConfig::load_or_default(Path::new("/does/not/exist/config.toml"));
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.search.debounce_ms, 400);
    }

    #[test]
    fn test_config_load_invalid_toml_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search\ndebounce_ms = ").unwrap();

        let result = ShopscoutConfig::load(&path);
        assert!(matches!(result, Err(ShopscoutError::Config(_))));

        let fallback = ShopscoutConfig::load_or_default(&path);
        assert_eq!(fallback.search.debounce_ms, 400);
    }

    #[test]
    fn test_config_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ShopscoutConfig::default();
        config.api.base_url = "http://10.0.0.5:9000".to_string();
        config.search.min_query_chars = 3;
        config.chat.fallback_reply = "Try again later.".to_string();
        config.save(&path).unwrap();

        let loaded = ShopscoutConfig::load(&path).unwrap();
        assert_eq!(loaded.api.base_url, "http://10.0.0.5:9000");
        assert_eq!(loaded.search.min_query_chars, 3);
        assert_eq!(loaded.chat.fallback_reply, "Try again later.");
    }
}
