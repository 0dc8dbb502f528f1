// ⚙️ Configuration - JSON file with defaults, overridden by environment

use crate::analytics::DEFAULT_TOP_LIMIT;
use crate::dataset::LoadPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Bundled business center dataset (JSON array)
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Browser bundle served by the web server
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    #[serde(default = "default_top_limit")]
    pub top_limit: usize,

    #[serde(default)]
    pub load_policy: LoadPolicy,

    /// trace, debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("data/business_centers.json")
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("web")
}

fn default_top_limit() -> usize {
    DEFAULT_TOP_LIMIT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AtlasConfig {
    fn default() -> Self {
        AtlasConfig {
            dataset_path: default_dataset_path(),
            bind_addr: default_bind_addr(),
            static_dir: default_static_dir(),
            top_limit: default_top_limit(),
            load_policy: LoadPolicy::default(),
            log_level: default_log_level(),
        }
    }
}

impl AtlasConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("ATLAS_DATASET") {
            self.dataset_path = PathBuf::from(path);
        }
        if let Some(addr) = lookup("ATLAS_BIND") {
            self.bind_addr = addr;
        }
        if let Some(dir) = lookup("ATLAS_STATIC_DIR") {
            self.static_dir = PathBuf::from(dir);
        }
        if let Some(limit) = lookup("ATLAS_TOP_LIMIT") {
            self.top_limit = limit
                .trim()
                .parse()
                .with_context(|| format!("ATLAS_TOP_LIMIT is not a count: {}", limit))?;
        }
        if let Some(level) = lookup("ATLAS_LOG") {
            self.log_level = level;
        }
        Ok(self)
    }

    pub fn apply_env(self) -> Result<Self> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Defaults or `path`, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        base.apply_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AtlasConfig::default();

        assert_eq!(config.dataset_path, PathBuf::from("data/business_centers.json"));
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.top_limit, 10);
        assert_eq!(config.load_policy, LoadPolicy::SkipInvalid);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AtlasConfig =
            serde_json::from_str(r#"{"top_limit": 5, "load_policy": "strict"}"#).unwrap();

        assert_eq!(config.top_limit, 5);
        assert_eq!(config.load_policy, LoadPolicy::Strict);
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ATLAS_DATASET", "/srv/atlas/data.json"),
            ("ATLAS_TOP_LIMIT", " 25 "),
            ("ATLAS_LOG", "debug"),
        ]
        .into_iter()
        .collect();

        let config = AtlasConfig::default()
            .apply_overrides(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.dataset_path, PathBuf::from("/srv/atlas/data.json"));
        assert_eq!(config.top_limit, 25);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_invalid_limit_override() {
        let result = AtlasConfig::default().apply_overrides(|name| {
            (name == "ATLAS_TOP_LIMIT").then(|| "many".to_string())
        });

        assert!(result.is_err());
    }

    #[test]
    fn test_missing_config_file() {
        assert!(AtlasConfig::from_file("/nonexistent/atlas.json").is_err());
    }
}
