use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeouts for collaborator calls (the `sync` section of `funnel.config.json`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfig {
    pub load_timeout_ms: u64,
    pub write_timeout_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            load_timeout_ms: 5_000,
            write_timeout_ms: 5_000,
        }
    }
}

impl SyncConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: SyncConfig = serde_json::from_str(r#"{"writeTimeoutMs": 250}"#).unwrap();
        assert_eq!(config.load_timeout(), Duration::from_secs(5));
        assert_eq!(config.write_timeout(), Duration::from_millis(250));
    }
}
