use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::campaigns::TransitionPolicyKind;
use crate::fulfillment::ProviderKind;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub campaigns: CampaignConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let provider_name =
            env::var("FULFILLMENT_PROVIDER").unwrap_or_else(|_| "manual".to_string());
        let fulfillment_provider = ProviderKind::from_name(&provider_name)
            .ok_or(ConfigError::UnknownFulfillmentProvider(provider_name))?;

        let policy_name =
            env::var("TRANSITION_POLICY").unwrap_or_else(|_| "permissive".to_string());
        let transition_policy = TransitionPolicyKind::from_name(&policy_name)
            .ok_or(ConfigError::UnknownTransitionPolicy(policy_name))?;

        let coverage_csv = env::var("COVERAGE_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            campaigns: CampaignConfig {
                fulfillment_provider,
                transition_policy,
                coverage_csv,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Campaign back-office wiring: which adapters and policies the service runs with.
#[derive(Debug, Clone)]
pub struct CampaignConfig {
    pub fulfillment_provider: ProviderKind,
    pub transition_policy: TransitionPolicyKind,
    pub coverage_csv: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    UnknownFulfillmentProvider(String),
    UnknownTransitionPolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::UnknownFulfillmentProvider(name) => {
                write!(f, "unknown fulfillment provider: {name}")
            }
            ConfigError::UnknownTransitionPolicy(name) => {
                write!(
                    f,
                    "TRANSITION_POLICY must be 'permissive' or 'lifecycle', got '{name}'"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "FULFILLMENT_PROVIDER",
            "TRANSITION_POLICY",
            "COVERAGE_CSV",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.campaigns.fulfillment_provider, ProviderKind::Manual);
        assert_eq!(
            config.campaigns.transition_policy,
            TransitionPolicyKind::Permissive
        );
        assert!(config.campaigns.coverage_csv.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn rejects_unknown_fulfillment_provider() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FULFILLMENT_PROVIDER", "lob");
        let err = AppConfig::load().expect_err("lob has no adapter");
        assert!(matches!(err, ConfigError::UnknownFulfillmentProvider(ref name) if name == "lob"));
        reset_env();
    }

    #[test]
    fn selects_strict_lifecycle_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TRANSITION_POLICY", "lifecycle");
        env::set_var("COVERAGE_CSV", "coverage_counts.csv");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.campaigns.transition_policy,
            TransitionPolicyKind::Lifecycle
        );
        assert_eq!(
            config.campaigns.coverage_csv,
            Some(PathBuf::from("coverage_counts.csv"))
        );
        reset_env();
    }
}
