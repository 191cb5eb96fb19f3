use crate::calendar_date::CalendarDate;
use crate::clock::Clock;
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "WARD_CALENDAR";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

/// Where the roster lives. With neither path set the seeded wards are used.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub json_path: Option<PathBuf>,
    #[serde(default)]
    pub sqlite_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleConfig {
    /// Occurrences shown per ward in list views.
    #[serde(default = "default_summary_count")]
    pub summary_count: usize,
    /// Occurrences shown on a single ward's page.
    #[serde(default = "default_detail_count")]
    pub detail_count: usize,
    /// Pin "today" to a fixed date (demos and tests).
    #[serde(default)]
    pub today: Option<CalendarDate>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            summary_count: default_summary_count(),
            detail_count: default_detail_count(),
            today: None,
        }
    }
}

impl ScheduleConfig {
    pub fn clock(&self) -> Clock {
        Clock::fixed_or_system(self.today)
    }
}

fn default_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_summary_count() -> usize {
    1
}

fn default_detail_count() -> usize {
    6
}

impl AppConfig {
    /// Layered load: built-in defaults, then the optional TOML file, then
    /// `WARD_CALENDAR__SECTION__KEY` environment variables.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(false));
        }
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_card_and_detail_views() {
        let config = AppConfig::default();
        assert_eq!(config.schedule.summary_count, 1);
        assert_eq!(config.schedule.detail_count, 6);
        assert_eq!(config.schedule.clock(), Clock::System);
        assert_eq!(config.http.addr, "0.0.0.0:3000");
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ward-calendar.toml");
        std::fs::write(
            &path,
            "[schedule]\ndetail_count = 3\ntoday = \"2024-03-01\"\n\n[log]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let config = AppConfig::load(path.to_str()).unwrap();
        assert_eq!(config.schedule.detail_count, 3);
        assert_eq!(config.schedule.summary_count, 1);
        assert_eq!(config.log.level, "debug");
        assert_eq!(
            config.schedule.clock(),
            Clock::Fixed(CalendarDate::from_ymd(2024, 3, 1).unwrap())
        );
    }
}
