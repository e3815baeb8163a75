use funnel_evaluator::Device;
use funnel_workspace::SyncConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "funnel.config.json";

/// Funnel project configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Output directory for rendered pages and new funnels
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Device used when `--device` is not given
    #[serde(default)]
    pub default_device: Device,

    /// Backend call timeouts
    #[serde(default)]
    pub sync: SyncConfig,
}

fn default_out_dir() -> String {
    "dist".to_string()
}

impl Config {
    /// Load config from a directory; a missing file gives the defaults
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Absolute output directory, unless overridden
    pub fn out_dir(&self, cwd: &Path, overridden: Option<&str>) -> PathBuf {
        cwd.join(overridden.unwrap_or(&self.out_dir))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            default_device: Device::default(),
            sync: SyncConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "outDir": "public",
            "defaultDevice": "mobile",
            "sync": { "loadTimeoutMs": 1000, "writeTimeoutMs": 2000 }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.out_dir, "public");
        assert_eq!(config.default_device, Device::Mobile);
        assert_eq!(config.sync.load_timeout(), Duration::from_secs(1));
        assert_eq!(config.sync.write_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.out_dir, "dist");
        assert_eq!(config.default_device, Device::Desktop);
        assert_eq!(config.sync, SyncConfig::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "defaultDevice": "tablet" }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.default_device, Device::Tablet);
        assert_eq!(config.out_dir, "dist");
        assert_eq!(config.out_dir(dir.path(), Some("x")), dir.path().join("x"));
    }
}
