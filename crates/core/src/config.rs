//! Configuration loading.
//!
//! Values come from the environment (optionally seeded from a `.env` file) and
//! can be overridden programmatically through [`ConfigBuilder`]. Every setting
//! has a default, so an empty environment is a valid configuration.

use crate::constraint::AspectRatio;
use crate::drag::HIT_TOLERANCE;
use crate::error::{AppError, Result};
use crate::preset::parse_ratio;
use dotenvy::dotenv;
use std::env;

pub const ENV_HIT_TOLERANCE: &str = "SNAPCROP_HIT_TOLERANCE";
pub const ENV_DEFAULT_RATIO: &str = "SNAPCROP_DEFAULT_RATIO";
pub const ENV_JPEG_QUALITY: &str = "SNAPCROP_JPEG_QUALITY";

const DEFAULT_JPEG_QUALITY: u8 = 90;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Corner grab distance in view pixels.
    pub hit_tolerance: f64,
    /// Ratio selected when a session starts; `None` is free-form.
    pub default_ratio: Option<AspectRatio>,
    /// Quality used when exporting JPEG files (1-100).
    pub jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hit_tolerance: HIT_TOLERANCE,
            default_ratio: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl Config {
    /// Loads configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if a variable is set but cannot be parsed.
    pub fn load() -> Result<Self> {
        // Load .env file if it exists, ignore if it doesn't
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(raw) = lookup(ENV_HIT_TOLERANCE) {
            let value: f64 = raw
                .trim()
                .parse()
                .map_err(|_| AppError::config(format!("{ENV_HIT_TOLERANCE} must be a number, got '{raw}'")))?;
            builder = builder.with_hit_tolerance(value);
        }

        if let Some(raw) = lookup(ENV_DEFAULT_RATIO) {
            let ratio = parse_ratio(&raw)
                .map_err(|e| AppError::config(format!("{ENV_DEFAULT_RATIO}: {e}")))?;
            builder = builder.with_ratio(ratio);
        }

        if let Some(raw) = lookup(ENV_JPEG_QUALITY) {
            let value: u8 = raw
                .trim()
                .parse()
                .map_err(|_| AppError::config(format!("{ENV_JPEG_QUALITY} must be 1-100, got '{raw}'")))?;
            builder = builder.with_jpeg_quality(value);
        }

        builder.build()
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Programmatic overrides on top of the defaults.
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    hit_tolerance: Option<f64>,
    default_ratio: Option<Option<AspectRatio>>,
    jpeg_quality: Option<u8>,
}

impl ConfigBuilder {
    pub fn with_hit_tolerance(mut self, tolerance: f64) -> Self {
        self.hit_tolerance = Some(tolerance);
        self
    }

    pub fn with_ratio(mut self, ratio: Option<AspectRatio>) -> Self {
        self.default_ratio = Some(ratio);
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality);
        self
    }

    /// Validates and assembles the configuration.
    pub fn build(self) -> Result<Config> {
        let defaults = Config::default();

        let hit_tolerance = self.hit_tolerance.unwrap_or(defaults.hit_tolerance);
        if !hit_tolerance.is_finite() || hit_tolerance < 0.0 {
            return Err(AppError::config(format!(
                "hit tolerance must be a non-negative number, got {hit_tolerance}"
            )));
        }

        let jpeg_quality = self.jpeg_quality.unwrap_or(defaults.jpeg_quality);
        if !(1..=100).contains(&jpeg_quality) {
            return Err(AppError::config(format!(
                "JPEG quality must be 1-100, got {jpeg_quality}"
            )));
        }

        Ok(Config {
            hit_tolerance,
            default_ratio: self.default_ratio.unwrap_or(defaults.default_ratio),
            jpeg_quality,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn reads_all_variables() {
        let config = Config::from_lookup(lookup(&[
            (ENV_HIT_TOLERANCE, "14"),
            (ENV_DEFAULT_RATIO, "16:9"),
            (ENV_JPEG_QUALITY, "75"),
        ]))
        .unwrap();
        assert_eq!(config.hit_tolerance, 14.0);
        assert_eq!(config.default_ratio, AspectRatio::new(16.0, 9.0));
        assert_eq!(config.jpeg_quality, 75);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let err = Config::from_lookup(lookup(&[(ENV_DEFAULT_RATIO, "wide")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let err = Config::from_lookup(lookup(&[(ENV_JPEG_QUALITY, "0")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let err = Config::builder().with_hit_tolerance(-1.0).build().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
