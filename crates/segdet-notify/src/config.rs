//! Receiver configuration.

/// Notification receiver configuration.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Max request body size
    pub max_body_size: usize,
    /// Serve Prometheus metrics at `/metrics`
    pub metrics_enabled: bool,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_body_size: 256 * 1024, // 256KiB, SNS caps messages well below this
            metrics_enabled: true,
            environment: "development".to_string(),
        }
    }
}

impl NotifyConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("NOTIFY_HOST").unwrap_or(defaults.host),
            port: std::env::var("NOTIFY_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.metrics_enabled),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "NOTIFY_HOST",
        "NOTIFY_PORT",
        "MAX_BODY_SIZE",
        "METRICS_ENABLED",
        "ENVIRONMENT",
    ];

    fn clear() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear();
        let config = NotifyConfig::from_env();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_body_size, 256 * 1024);
        assert!(config.metrics_enabled);
        assert!(!config.is_production());
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear();
        std::env::set_var("NOTIFY_PORT", "9090");
        std::env::set_var("METRICS_ENABLED", "false");
        std::env::set_var("ENVIRONMENT", "Production");
        std::env::set_var("MAX_BODY_SIZE", "not-a-number");

        let config = NotifyConfig::from_env();
        assert_eq!(config.port, 9090);
        assert!(!config.metrics_enabled);
        assert!(config.is_production());
        assert_eq!(config.max_body_size, 256 * 1024);
        clear();
    }
}
