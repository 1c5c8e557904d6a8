use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use validator::Validate;

use crate::core::distance::{GeoConfig, HAVERSINE_FUNCTION, KM_PER_DEGREE, MIN_COS_LAT};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub database: DatabaseSettings,
    #[serde(default)]
    #[validate(nested)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DatabaseSettings {
    #[validate(length(min = 1))]
    pub url: String,
    #[validate(range(min = 1))]
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

/// Tuning for distance searches
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchSettings {
    #[serde(default = "default_km_per_degree")]
    #[validate(range(min = 1.0))]
    pub km_per_degree: f64,
    #[serde(default = "default_cos_floor")]
    #[validate(range(min = 0.0001, max = 1.0))]
    pub cos_floor: f64,
    /// Set to an empty string to disable the exact distance step
    #[serde(default = "default_haversine_function")]
    pub haversine_function: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            km_per_degree: default_km_per_degree(),
            cos_floor: default_cos_floor(),
            haversine_function: default_haversine_function(),
        }
    }
}

impl SearchSettings {
    pub fn geo_config(&self) -> GeoConfig {
        GeoConfig {
            km_per_degree: self.km_per_degree,
            cos_floor: self.cos_floor,
            haversine_function: Some(self.haversine_function.trim())
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        }
    }
}

fn default_km_per_degree() -> f64 { KM_PER_DEGREE }
fn default_cos_floor() -> f64 { MIN_COS_LAT }
fn default_haversine_function() -> String { HAVERSINE_FUNCTION.to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SCHOOLS_), then DATABASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SCHOOLS__SEARCH__COS_FLOOR -> search.cos_floor
            .add_source(
                Environment::with_prefix("SCHOOLS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", url)?;
        }

        Self::finish(builder.build()?)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SCHOOLS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::finish(settings)
    }

    fn finish(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings
            .validate()
            .map_err(|e| ConfigError::Message(format!("Invalid configuration: {}", e)))?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<Settings, ConfigError> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Settings::finish(config)
    }

    #[test]
    fn test_default_search_settings() {
        let search = SearchSettings::default();
        assert_eq!(search.km_per_degree, 111.0);
        assert_eq!(search.cos_floor, 0.01);
        assert_eq!(search.geo_config(), GeoConfig::default());
    }

    #[test]
    fn test_empty_function_disables_exact_step() {
        let search = SearchSettings {
            haversine_function: "  ".to_string(),
            ..SearchSettings::default()
        };
        assert_eq!(search.geo_config().haversine_function, None);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "compact");
    }

    #[test]
    fn test_load_minimal_toml() {
        let settings = from_toml(
            r#"
            [database]
            url = "postgres://localhost/schools"

            [search]
            cos_floor = 0.05
            "#,
        )
        .expect("valid settings");

        assert_eq!(settings.search.cos_floor, 0.05);
        assert_eq!(settings.search.km_per_degree, 111.0);
        assert_eq!(settings.logging.format, "compact");
    }

    #[test]
    fn test_rejects_zero_cos_floor() {
        let result = from_toml(
            r#"
            [database]
            url = "postgres://localhost/schools"

            [search]
            cos_floor = 0.0
            "#,
        );

        assert!(result.is_err());
    }
}
