//! Tracing / logging initialisation helpers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log level per component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Global default level: "trace" | "debug" | "info" | "warn" | "error"
    #[serde(default = "default_level")]
    pub level: String,
    /// Override per component: component_name → level
    #[serde(default)]
    pub components: HashMap<String, String>,
    /// Emit JSON structured logs (true) or human-readable text (false)
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            components: HashMap::new(),
            json: false,
        }
    }
}

/// Initialise tracing with the given log config.
///
/// Call once at application startup. Returns `false` if a global
/// subscriber was already installed (e.g. by an embedding test harness),
/// in which case the existing one stays in place.
pub fn init_tracing(config: &LogConfig) -> bool {
    // Build the directive string: "info,logcast_stream=debug" etc.
    let mut directives = config.level.clone();
    for (component, level) in &config.components {
        directives.push_str(&format!(",{}={}", component.replace('-', "_"), level));
    }

    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init()
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.json);
    }

    #[test]
    fn second_init_is_rejected_not_fatal() {
        let config = LogConfig::default();
        let first = init_tracing(&config);
        let second = init_tracing(&config);
        // Whichever call won, the other must report failure instead of
        // panicking.
        assert!(first || !second);
        assert!(!(first && second));
    }
}
