use crate::presentation::config::{Environment, LoggingSettings};

const DEFAULT_DIRECTIVES: &str = "tunefold=debug,tower_http=debug";

/// Set to `json` to force JSON output regardless of settings.
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    pub level: String,
}

impl TracingConfig {
    pub fn from_settings(settings: &LoggingSettings, environment: Environment) -> Self {
        Self {
            environment: environment.to_string(),
            json_format: settings.enable_json || json_forced(),
            level: settings.level.clone(),
        }
    }

    /// Filter used when `RUST_LOG` is not set.
    pub fn default_filter(&self) -> String {
        format!("{},{}", self.level, DEFAULT_DIRECTIVES)
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default().to_string(),
            json_format: false,
            level: "info".to_string(),
        }
    }
}

fn json_forced() -> bool {
    std::env::var(LOG_FORMAT_VAR).is_ok_and(|v| v.trim().eq_ignore_ascii_case("json"))
}
