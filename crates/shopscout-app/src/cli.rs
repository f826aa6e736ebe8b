//! Command-line arguments for the `shopscout` binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Shopscout: search a product catalog and ask the shopping assistant from
/// the terminal.
#[derive(Parser, Debug)]
#[command(name = "shopscout", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Base URL of the catalog backend (e.g. http://127.0.0.1:8000).
    #[arg(short = 'u', long = "api-url")]
    pub api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Priority: --config flag > SHOPSCOUT_CONFIG env var > ~/.shopscout/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("SHOPSCOUT_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Priority: --api-url flag > SHOPSCOUT_API_URL env var > config file value.
    pub fn resolve_api_url(&self, config_url: &str) -> String {
        if let Some(ref url) = self.api_url {
            return url.clone();
        }
        match std::env::var("SHOPSCOUT_API_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => config_url.to_string(),
        }
    }

    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".shopscout").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".shopscout").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::parse_from(std::iter::once("shopscout").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_all_flags() {
        let args = parse(&[
            "--config",
            "/tmp/shop.toml",
            "--api-url",
            "http://backend:9000",
            "-l",
            "debug",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/shop.toml")));
        assert_eq!(args.api_url.as_deref(), Some("http://backend:9000"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_config_flag_wins() {
        let args = parse(&["-c", "custom.toml"]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("custom.toml"));
    }

    #[test]
    fn test_api_url_flag_wins_over_config() {
        let args = parse(&["-u", "http://flag:1"]);
        assert_eq!(args.resolve_api_url("http://config:2"), "http://flag:1");
    }

    #[test]
    fn test_log_level_falls_back_to_config() {
        assert_eq!(parse(&[]).resolve_log_level("warn"), "warn");
        assert_eq!(parse(&["-l", "trace"]).resolve_log_level("warn"), "trace");
    }

    #[test]
    fn test_default_config_path_file_name() {
        let path = default_config_path();
        assert_eq!(path.file_name().unwrap(), "config.toml");
    }
}
