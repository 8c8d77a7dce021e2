//! Navigator timing configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use gclusters_types::error::{GcError, Result};

/// Fade timings and the transition opacity of the mount point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NavigatorConfig {
    /// Delay between fading the mount point out and replacing its HTML.
    #[serde(default = "default_fade_out_ms")]
    pub fade_out_ms: u64,
    /// Delay between running page hooks and restoring full opacity.
    #[serde(default = "default_fade_in_ms")]
    pub fade_in_ms: u64,
    /// Opacity shown while a navigation is loading.
    #[serde(default = "default_loading_opacity")]
    pub loading_opacity: f32,
}

fn default_fade_out_ms() -> u64 {
    200
}
fn default_fade_in_ms() -> u64 {
    50
}
fn default_loading_opacity() -> f32 {
    0.7
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            fade_out_ms: default_fade_out_ms(),
            fade_in_ms: default_fade_in_ms(),
            loading_opacity: default_loading_opacity(),
        }
    }
}

impl NavigatorConfig {
    /// Parse a `[navigator]`-style TOML table.
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.loading_opacity) {
            return Err(GcError::Config(format!(
                "loading_opacity must be within 0..=1, got {}",
                self.loading_opacity
            )));
        }
        Ok(())
    }

    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }

    pub fn fade_in(&self) -> Duration {
        Duration::from_millis(self.fade_in_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = NavigatorConfig::default();
        assert_eq!(config.fade_out(), Duration::from_millis(200));
        assert_eq!(config.fade_in(), Duration::from_millis(50));
        assert!((config.loading_opacity - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = NavigatorConfig::from_toml("fade_out_ms = 0").unwrap();
        assert_eq!(config.fade_out_ms, 0);
        assert_eq!(config.fade_in_ms, 50);
    }

    #[test]
    fn rejects_out_of_range_opacity() {
        assert!(NavigatorConfig::from_toml("loading_opacity = 1.5").is_err());
    }
}
