use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

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
    pub store: StoreConfig,
    pub admin: AdminConfig,
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

        let store = StoreConfig::from_env()?;

        let passcode = env::var("ADMIN_PASSCODE")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        if passcode.is_none() && environment == AppEnvironment::Production {
            return Err(ConfigError::MissingAdminPasscode);
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            store,
            admin: AdminConfig { passcode },
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

/// Which document store backs the submission collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Firestore(FirestoreConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub request_timeout: Duration,
}

impl StoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = env::var("STORE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        let raw_backend = env::var("STORE_BACKEND").unwrap_or_else(|_| "memory".to_string());
        let backend = match raw_backend.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => StoreBackend::Memory,
            "firestore" => {
                let project_id = env::var("FIRESTORE_PROJECT_ID")
                    .ok()
                    .filter(|value| !value.trim().is_empty())
                    .ok_or(ConfigError::MissingFirestoreProject)?;
                StoreBackend::Firestore(FirestoreConfig {
                    project_id,
                    api_key: env::var("FIRESTORE_API_KEY").ok(),
                    base_url: env::var("FIRESTORE_BASE_URL")
                        .unwrap_or_else(|_| DEFAULT_FIRESTORE_BASE_URL.to_string()),
                })
            }
            _ => return Err(ConfigError::UnknownStoreBackend(raw_backend)),
        };

        Ok(Self {
            backend,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Admin console login settings. The passcode only gates the session flag; it is not an
/// authentication system.
#[derive(Debug, Clone, Default)]
pub struct AdminConfig {
    pub passcode: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout,
    UnknownStoreBackend(String),
    MissingFirestoreProject,
    MissingAdminPasscode,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "STORE_TIMEOUT_SECS must be a positive number of seconds")
            }
            ConfigError::UnknownStoreBackend(value) => {
                write!(f, "STORE_BACKEND '{value}' is not one of: memory, firestore")
            }
            ConfigError::MissingFirestoreProject => {
                write!(f, "FIRESTORE_PROJECT_ID is required when STORE_BACKEND=firestore")
            }
            ConfigError::MissingAdminPasscode => {
                write!(f, "ADMIN_PASSCODE must be set in production")
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
            "STORE_BACKEND",
            "STORE_TIMEOUT_SECS",
            "FIRESTORE_PROJECT_ID",
            "FIRESTORE_API_KEY",
            "FIRESTORE_BASE_URL",
            "ADMIN_PASSCODE",
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
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.request_timeout, Duration::from_secs(10));
        assert!(config.admin.passcode.is_none());
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
    fn firestore_backend_requires_project() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("STORE_BACKEND", "firestore");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::MissingFirestoreProject)
        ));

        env::set_var("FIRESTORE_PROJECT_ID", "studio-site");
        let config = AppConfig::load().expect("config loads");
        match config.store.backend {
            StoreBackend::Firestore(firestore) => {
                assert_eq!(firestore.project_id, "studio-site");
                assert_eq!(firestore.base_url, DEFAULT_FIRESTORE_BASE_URL);
                assert!(firestore.api_key.is_none());
            }
            other => panic!("expected firestore backend, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_unknown_backend_and_zero_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("STORE_BACKEND", "postgres");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::UnknownStoreBackend(value)) if value == "postgres"
        ));

        reset_env();
        env::set_var("STORE_TIMEOUT_SECS", "0");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidTimeout)));
        reset_env();
    }

    #[test]
    fn production_requires_admin_passcode() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::MissingAdminPasscode)
        ));

        env::set_var("ADMIN_PASSCODE", "  open-sesame ");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.admin.passcode.as_deref(), Some("open-sesame"));
        reset_env();
    }
}
