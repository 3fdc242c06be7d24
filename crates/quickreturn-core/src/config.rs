use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub quick_return: QuickReturnConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// How significant scroll events move the bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealMode {
    /// Bars track the content position step by step
    ScrollLinked,
    /// Bars run a full show or hide animation as a group
    #[default]
    Animated,
}

/// What happens to a half-visible stack when scrolling stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapPolicy {
    /// Leave bars where they are
    #[default]
    None,
    /// Finish in the direction of the last significant scroll
    ToIntent,
    /// Show or hide depending on how much of the bar is visible
    ToMidpoint,
}

/// Easing curve handed to the host with every interpolation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    Linear,
    QuadIn,
    QuadOut,
    Cubic,
    BackOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickReturnConfig {
    #[serde(default)]
    pub reveal_mode: RevealMode,
    #[serde(default)]
    pub snap: SnapPolicy,
    /// Reveal every bar after scrolling has been idle for a while
    #[serde(default)]
    pub reveal_on_idle: bool,
    #[serde(default = "default_reveal_on_idle_after")]
    pub reveal_on_idle_after_ms: u64,
    /// 1.0 moves bars with the content, below 1.0 slower, above 1.0 faster
    #[serde(default = "default_parallax_factor")]
    pub parallax_factor: f32,
    /// Distance (px) scrolled towards the top before bars come back
    #[serde(default = "default_min_delta_before_show")]
    pub min_delta_before_show: i32,
    /// Distance (px) scrolled towards the bottom before bars leave
    #[serde(default = "default_min_delta_before_hide")]
    pub min_delta_before_hide: i32,
    #[serde(default = "default_show_duration")]
    pub show_duration_ms: u64,
    #[serde(default = "default_hide_duration")]
    pub hide_duration_ms: u64,
    #[serde(default = "default_show_easing")]
    pub show_easing: EasingType,
    #[serde(default = "default_hide_easing")]
    pub hide_easing: EasingType,
    /// Quiet period after which a continuous scroll source reports idle
    #[serde(default = "default_idle_quiet_period")]
    pub idle_quiet_period_ms: u64,
    /// Scroll steps this small count as settled for continuous sources
    #[serde(default = "default_touch_slop")]
    pub touch_slop: i32,
}

impl Default for QuickReturnConfig {
    fn default() -> Self {
        Self {
            reveal_mode: RevealMode::default(),
            snap: SnapPolicy::default(),
            reveal_on_idle: false,
            reveal_on_idle_after_ms: default_reveal_on_idle_after(),
            parallax_factor: default_parallax_factor(),
            min_delta_before_show: default_min_delta_before_show(),
            min_delta_before_hide: default_min_delta_before_hide(),
            show_duration_ms: default_show_duration(),
            hide_duration_ms: default_hide_duration(),
            show_easing: default_show_easing(),
            hide_easing: default_hide_easing(),
            idle_quiet_period_ms: default_idle_quiet_period(),
            touch_slop: default_touch_slop(),
        }
    }
}

impl QuickReturnConfig {
    pub fn show_duration(&self) -> Duration {
        Duration::from_millis(self.show_duration_ms)
    }

    pub fn hide_duration(&self) -> Duration {
        Duration::from_millis(self.hide_duration_ms)
    }

    pub fn reveal_on_idle_after(&self) -> Duration {
        Duration::from_millis(self.reveal_on_idle_after_ms)
    }

    pub fn idle_quiet_period(&self) -> Duration {
        Duration::from_millis(self.idle_quiet_period_ms)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if !self.parallax_factor.is_finite() || self.parallax_factor <= 0.0 {
            return Err(crate::Error::Config(format!(
                "parallax_factor must be a positive number, got {}",
                self.parallax_factor
            )));
        }
        if self.min_delta_before_show < 0 || self.min_delta_before_hide < 0 {
            return Err(crate::Error::Config(
                "min_delta_before_show and min_delta_before_hide must not be negative".to_string(),
            ));
        }
        if self.touch_slop < 0 {
            return Err(crate::Error::Config("touch_slop must not be negative".to_string()));
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_reveal_on_idle_after() -> u64 {
    800
}

fn default_parallax_factor() -> f32 {
    1.0
}

fn default_min_delta_before_show() -> i32 {
    10
}

fn default_min_delta_before_hide() -> i32 {
    30 // hiding needs a more deliberate swipe than showing
}

fn default_show_duration() -> u64 {
    300
}

fn default_hide_duration() -> u64 {
    200
}

fn default_show_easing() -> EasingType {
    EasingType::BackOut
}

fn default_hide_easing() -> EasingType {
    EasingType::QuadIn
}

fn default_idle_quiet_period() -> u64 {
    200
}

fn default_touch_slop() -> i32 {
    8
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults when it is missing
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self =
                toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
            config.quick_return.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/quickreturn/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("quickreturn")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QuickReturnConfig::default();
        assert_eq!(config.reveal_mode, RevealMode::Animated);
        assert_eq!(config.snap, SnapPolicy::None);
        assert!(!config.reveal_on_idle);
        assert_eq!(config.parallax_factor, 1.0);
        assert!(config.min_delta_before_hide > config.min_delta_before_show);
        assert_eq!(config.show_duration(), Duration::from_millis(300));
        assert_eq!(config.hide_duration(), Duration::from_millis(200));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [quick_return]
            reveal_mode = "scroll_linked"
            snap = "to_midpoint"
            parallax_factor = 0.8
            "#,
        )
        .unwrap();

        assert_eq!(config.quick_return.reveal_mode, RevealMode::ScrollLinked);
        assert_eq!(config.quick_return.snap, SnapPolicy::ToMidpoint);
        assert!((config.quick_return.parallax_factor - 0.8).abs() < f32::EPSILON);
        assert_eq!(config.quick_return.reveal_on_idle_after_ms, 800);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_validate_rejects_bad_parallax() {
        let mut config = QuickReturnConfig::default();
        assert!(config.validate().is_ok());

        config.parallax_factor = 0.0;
        assert!(config.validate().is_err());

        config.parallax_factor = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("quickreturn-config-{}", std::process::id()));
        let path = dir.join("config.toml");

        let mut config = AppConfig::default();
        config.quick_return.snap = SnapPolicy::ToIntent;
        config.quick_return.reveal_on_idle = true;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.quick_return.snap, SnapPolicy::ToIntent);
        assert!(loaded.quick_return.reveal_on_idle);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("quickreturn-does-not-exist/config.toml");
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.quick_return.reveal_mode, RevealMode::Animated);
    }
}
