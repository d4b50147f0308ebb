//! Configuration file parsing and management.
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. built-in defaults ([`CheckConfig::default`])
//! 2. TOML files: XDG config, then home directory, then current directory
//!    (or a single explicit file)
//! 3. `DC_*` environment variables
//! 4. whatever the front end applies on top (CLI flags)
//!
//! ```toml
//! [defaults]
//! timeout = "8s"
//! tlds = ["com", "io", "dev"]
//! follow_referrals = 1
//!
//! [pricing.me]
//! registration = 2.98
//! renewal = 19.98
//! ```

use crate::error::DomainCheckError;
use crate::pricing::{validate_prices, PricePair};
use crate::types::CheckConfig;
use crate::utils::{parse_timeout_string, parse_tld_list};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Upper bound on referral hops accepted from configuration.
const MAX_FOLLOW_REFERRALS: usize = 5;

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    /// Default lookup settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Per-suffix price overrides and additions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<HashMap<String, PricePair>>,
}

/// Default lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultsConfig {
    /// Lookup timeout (as string, e.g., "5s", "30s")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// TLDs checked when none are given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tlds: Option<Vec<String>>,

    /// Registrar referrals to follow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_referrals: Option<usize>,

    /// Fixed WHOIS server (`host` or `host:port`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois_server: Option<String>,
}

impl FileConfig {
    /// Layer this file's settings over `config`.
    pub fn apply_to(&self, mut config: CheckConfig) -> Result<CheckConfig, DomainCheckError> {
        if let Some(defaults) = &self.defaults {
            if let Some(timeout_str) = &defaults.timeout {
                let timeout = parse_timeout_string(timeout_str).ok_or_else(|| {
                    DomainCheckError::config(format!("Invalid timeout format '{}'", timeout_str))
                })?;
                config = config.with_timeout(timeout);
            }
            if let Some(tlds) = &defaults.tlds {
                config.default_tlds = normalize_tlds(tlds);
            }
            if let Some(hops) = defaults.follow_referrals {
                config.follow_referrals = hops;
            }
            if let Some(server) = &defaults.whois_server {
                config.whois_server = Some(server.trim().to_string());
            }
        }

        if let Some(prices) = &self.pricing {
            config.pricing.extend(prices);
        }

        Ok(config)
    }
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to report which files were loaded
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DomainCheckError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainCheckError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainCheckError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)?;

        self.validate_config(&config)?;

        if self.verbose {
            tracing::info!(path = %path.display(), "Loaded configuration file");
        }

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// Files that fail to load are skipped with a warning.
    pub fn discover_and_load(&self) -> FileConfig {
        let mut merged_config = FileConfig::default();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => merged_config = self.merge_configs(merged_config, config),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Ignoring configuration file"),
            }
        }

        merged_config
    }

    /// Get the local configuration file path.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./domain-checker.toml", "./.domain-checker.toml"];

        candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Get the global configuration file path in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        let path = Path::new(&home).join(".domain-checker.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Get the XDG configuration file path.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-checker").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations; values from `higher` win.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(mut lower_defaults), Some(higher_defaults)) => {
                    if higher_defaults.timeout.is_some() {
                        lower_defaults.timeout = higher_defaults.timeout;
                    }
                    if higher_defaults.tlds.is_some() {
                        lower_defaults.tlds = higher_defaults.tlds;
                    }
                    if higher_defaults.follow_referrals.is_some() {
                        lower_defaults.follow_referrals = higher_defaults.follow_referrals;
                    }
                    if higher_defaults.whois_server.is_some() {
                        lower_defaults.whois_server = higher_defaults.whois_server;
                    }
                    Some(lower_defaults)
                }
                (lower_defaults, higher_defaults) => higher_defaults.or(lower_defaults),
            },
            pricing: match (lower.pricing, higher.pricing) {
                (Some(mut lower_prices), Some(higher_prices)) => {
                    lower_prices.extend(higher_prices);
                    Some(lower_prices)
                }
                (lower_prices, higher_prices) => higher_prices.or(lower_prices),
            },
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), DomainCheckError> {
        if let Some(defaults) = &config.defaults {
            if let Some(timeout_str) = &defaults.timeout {
                if parse_timeout_string(timeout_str).is_none() {
                    return Err(DomainCheckError::config(format!(
                        "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
                        timeout_str
                    )));
                }
            }

            if let Some(tlds) = &defaults.tlds {
                if tlds.is_empty() {
                    return Err(DomainCheckError::config("Default TLD list cannot be empty"));
                }
                for tld in tlds {
                    let tld_clean = tld.trim().trim_start_matches('.');
                    if tld_clean.is_empty() || tld_clean.contains('.') || tld_clean.contains(' ') {
                        return Err(DomainCheckError::config(format!(
                            "Invalid TLD '{}' in defaults",
                            tld
                        )));
                    }
                }
            }

            if let Some(hops) = defaults.follow_referrals {
                if hops > MAX_FOLLOW_REFERRALS {
                    return Err(DomainCheckError::config(format!(
                        "follow_referrals must be between 0 and {}",
                        MAX_FOLLOW_REFERRALS
                    )));
                }
            }

            if let Some(server) = &defaults.whois_server {
                if server.trim().is_empty() {
                    return Err(DomainCheckError::config("whois_server cannot be empty"));
                }
            }
        }

        if let Some(prices) = &config.pricing {
            validate_prices(prices)?;
        }

        Ok(())
    }
}

/// Environment variable configuration (`DC_*`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub timeout: Option<String>,
    pub tlds: Option<Vec<String>>,
    pub follow_referrals: Option<usize>,
    pub whois_server: Option<String>,
    pub config: Option<String>,
}

impl EnvConfig {
    /// Layer environment settings over `config`.
    pub fn apply_to(&self, mut config: CheckConfig) -> CheckConfig {
        if let Some(timeout) = self.timeout.as_deref().and_then(parse_timeout_string) {
            config = config.with_timeout(timeout);
        }
        if let Some(tlds) = &self.tlds {
            config.default_tlds = tlds.clone();
        }
        if let Some(hops) = self.follow_referrals {
            config.follow_referrals = hops;
        }
        if let Some(server) = &self.whois_server {
            config.whois_server = Some(server.clone());
        }
        config
    }
}

/// Load configuration from the process environment.
///
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    load_env_config_from(|key| env::var(key).ok())
}

/// Load `DC_*` settings through an arbitrary variable source.
pub fn load_env_config_from<F>(var: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    // DC_TIMEOUT - lookup timeout
    if let Some(timeout_str) = var("DC_TIMEOUT") {
        if parse_timeout_string(&timeout_str).is_some() {
            env_config.timeout = Some(timeout_str);
        } else {
            tracing::warn!(value = %timeout_str, "Invalid DC_TIMEOUT, use format like '5s', '30s', '2m'");
        }
    }

    // DC_TLD - comma-separated TLD list
    if let Some(tld_str) = var("DC_TLD") {
        let tlds = parse_tld_list(&tld_str);
        if !tlds.is_empty() {
            env_config.tlds = Some(tlds);
        }
    }

    // DC_FOLLOW_REFERRALS - referral depth
    if let Some(val) = var("DC_FOLLOW_REFERRALS") {
        match val.trim().parse::<usize>() {
            Ok(hops) if hops <= MAX_FOLLOW_REFERRALS => env_config.follow_referrals = Some(hops),
            _ => tracing::warn!(
                value = %val,
                "Invalid DC_FOLLOW_REFERRALS, must be 0-{}",
                MAX_FOLLOW_REFERRALS
            ),
        }
    }

    // DC_WHOIS_SERVER - fixed WHOIS server
    if let Some(server) = var("DC_WHOIS_SERVER") {
        if !server.trim().is_empty() {
            env_config.whois_server = Some(server.trim().to_string());
        }
    }

    // DC_CONFIG - explicit config file
    if let Some(config_path) = var("DC_CONFIG") {
        if !config_path.trim().is_empty() {
            env_config.config = Some(config_path);
        }
    }

    env_config
}

/// Build a [`CheckConfig`] from files and environment.
///
/// `explicit_path` (or `DC_CONFIG`) replaces file discovery; an explicit file
/// that cannot be loaded is an error, discovered files are best-effort.
pub fn resolve_check_config(explicit_path: Option<&Path>) -> Result<CheckConfig, DomainCheckError> {
    let env_config = load_env_config();
    let manager = ConfigManager::new(true);

    let file_config = match explicit_path
        .map(Path::to_path_buf)
        .or_else(|| env_config.config.as_ref().map(PathBuf::from))
    {
        Some(path) => manager.load_file(path)?,
        None => manager.discover_and_load(),
    };

    let config = file_config.apply_to(CheckConfig::default())?;
    Ok(env_config.apply_to(config))
}

fn normalize_tlds(tlds: &[String]) -> Vec<String> {
    tlds.iter()
        .map(|t| t.trim().trim_start_matches('.').to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PriceEstimate;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_load_valid_config() {
        let file = write_config(
            r#"
[defaults]
timeout = "8s"
tlds = ["com", ".IO", "dev"]
follow_referrals = 0

[pricing.me]
registration = 2.98
renewal = 19.98

[pricing.com]
registration = 9.5
renewal = 14.0
"#,
        );

        let manager = ConfigManager::new(false);
        let file_config = manager.load_file(file.path()).unwrap();
        let config = file_config.apply_to(CheckConfig::default()).unwrap();

        assert_eq!(config.timeout, Duration::from_secs(8));
        assert_eq!(config.default_tlds, vec!["com", "io", "dev"]);
        assert_eq!(config.follow_referrals, 0);
        assert_eq!(config.pricing.estimate("x.me"), PriceEstimate::new(2.98, 19.98));
        assert_eq!(config.pricing.estimate("x.com"), PriceEstimate::new(9.5, 14.0));
        // untouched defaults survive
        assert_eq!(config.pricing.estimate("x.io"), PriceEstimate::new(39.98, 49.98));
    }

    #[test]
    fn test_missing_file_is_error() {
        let manager = ConfigManager::new(false);
        let result = manager.load_file("/nonexistent/domain-checker.toml");
        assert!(matches!(result, Err(DomainCheckError::FileError { .. })));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let file = write_config("[defaults\ntimeout = ");
        let result = ConfigManager::new(false).load_file(file.path());
        assert!(matches!(result, Err(DomainCheckError::ConfigError { .. })));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let manager = ConfigManager::new(false);

        for content in [
            "[defaults]\ntimeout = \"soon\"\n",
            "[defaults]\ntlds = []\n",
            "[defaults]\ntlds = [\"co.uk\"]\n",
            "[defaults]\nfollow_referrals = 9\n",
            "[defaults]\nwhois_server = \" \"\n",
            "[pricing.com]\nregistration = -1.0\nrenewal = 2.0\n",
        ] {
            let file = write_config(content);
            assert!(manager.load_file(file.path()).is_err(), "accepted: {}", content);
        }
    }

    #[test]
    fn test_merge_configs() {
        let manager = ConfigManager::new(false);

        let mut lower_prices = HashMap::new();
        lower_prices.insert(
            "me".to_string(),
            PricePair {
                registration: 1.0,
                renewal: 1.0,
            },
        );
        let lower = FileConfig {
            defaults: Some(DefaultsConfig {
                timeout: Some("5s".to_string()),
                tlds: Some(vec!["com".to_string()]),
                ..Default::default()
            }),
            pricing: Some(lower_prices),
        };

        let mut higher_prices = HashMap::new();
        higher_prices.insert(
            "me".to_string(),
            PricePair {
                registration: 3.0,
                renewal: 4.0,
            },
        );
        let higher = FileConfig {
            defaults: Some(DefaultsConfig {
                timeout: Some("20s".to_string()),
                ..Default::default()
            }),
            pricing: Some(higher_prices),
        };

        let merged = manager.merge_configs(lower, higher);
        let defaults = merged.defaults.unwrap();

        assert_eq!(defaults.timeout, Some("20s".to_string())); // Higher wins
        assert_eq!(defaults.tlds, Some(vec!["com".to_string()])); // Lower preserved
        assert_eq!(
            merged.pricing.unwrap().get("me"),
            Some(&PricePair {
                registration: 3.0,
                renewal: 4.0
            })
        );
    }

    #[test]
    fn test_merge_with_missing_sections() {
        let manager = ConfigManager::new(false);
        let only_lower = FileConfig {
            defaults: Some(DefaultsConfig {
                follow_referrals: Some(2),
                ..Default::default()
            }),
            pricing: None,
        };

        let merged = manager.merge_configs(only_lower.clone(), FileConfig::default());
        assert_eq!(merged, only_lower);
    }

    #[test]
    fn test_env_config() {
        let vars: HashMap<&str, &str> = [
            ("DC_TIMEOUT", "3s"),
            ("DC_TLD", "com, io"),
            ("DC_FOLLOW_REFERRALS", "2"),
            ("DC_WHOIS_SERVER", " 127.0.0.1:4343 "),
        ]
        .into_iter()
        .collect();

        let env_config = load_env_config_from(|k| vars.get(k).map(|v| v.to_string()));
        let config = env_config.apply_to(CheckConfig::default());

        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.default_tlds, vec!["com", "io"]);
        assert_eq!(config.follow_referrals, 2);
        assert_eq!(config.whois_server.as_deref(), Some("127.0.0.1:4343"));
    }

    #[test]
    fn test_invalid_env_values_ignored() {
        let vars: HashMap<&str, &str> = [
            ("DC_TIMEOUT", "whenever"),
            ("DC_TLD", " , "),
            ("DC_FOLLOW_REFERRALS", "100"),
        ]
        .into_iter()
        .collect();

        let env_config = load_env_config_from(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(env_config, EnvConfig::default());
    }
}
