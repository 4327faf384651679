//! Session tuning. Every field has a default; a JSON document may override any
//! subset of them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed clicker config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{0}` must be greater than zero")]
    Zero(&'static str),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClickerConfig {
    /// Base points per click, multiplied by the click upgrade.
    pub default_click_amount: u64,
    /// Base idle points per period, multiplied by the idle upgrade.
    pub default_idle_amount: u64,
    /// How long store feedback colours stay up.
    pub color_reset_seconds: u32,
    /// Idle income and per-minute statistics interval.
    pub idle_period_seconds: u32,
    pub ticks_per_second: u32,
    /// Wipe persisted storage whenever progress is loaded. Debug only.
    pub debug_clear_on_load: bool,
}

impl Default for ClickerConfig {
    fn default() -> Self {
        Self {
            default_click_amount: 1,
            default_idle_amount: 1,
            color_reset_seconds: 2,
            idle_period_seconds: 60,
            ticks_per_second: 10,
            debug_clear_on_load: false,
        }
    }
}

impl ClickerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ClickerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_click_amount == 0 {
            return Err(ConfigError::Zero("defaultClickAmount"));
        }
        if self.ticks_per_second == 0 {
            return Err(ConfigError::Zero("ticksPerSecond"));
        }
        if self.idle_period_seconds == 0 {
            return Err(ConfigError::Zero("idlePeriodSeconds"));
        }
        Ok(())
    }

    pub fn ticks_for_secs(&self, secs: u64) -> u64 {
        secs.saturating_mul(self.ticks_per_second as u64)
    }
}

/// localStorage key holding an optional JSON config override.
#[cfg(target_arch = "wasm32")]
const CONFIG_KEY: &str = "clickerConfig";

/// Read the override from localStorage, falling back to defaults.
#[cfg(target_arch = "wasm32")]
pub fn load_config() -> ClickerConfig {
    let raw = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .and_then(|s| s.get_item(CONFIG_KEY).ok())
        .flatten();
    match raw {
        Some(json) => ClickerConfig::from_json(&json).unwrap_or_else(|e| {
            log::warn!("{e}; using default config");
            ClickerConfig::default()
        }),
        None => ClickerConfig::default(),
    }
}
