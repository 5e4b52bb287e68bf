//! Server configuration, read from the process environment at startup.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use axum::http::HeaderValue;
use clinic_core::{ClinicManager, Database, FileKv, LocalStore, StoreResult};

/// Application-level constants
pub const APP_NAME: &str = "clinic-server";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_DATA_DIR: &str = "./clinic-data";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,clinic_core=debug,clinic_server=debug,tower_http=info"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set when CLINIC_STORE=sqlite")]
    MissingDatabaseUrl,
    #[error("unknown CLINIC_STORE '{0}' (expected 'sqlite' or 'local')")]
    UnknownStore(String),
    #[error("invalid PORT '{0}'")]
    InvalidPort(String),
    #[error("invalid boolean for {name}: '{value}'")]
    InvalidFlag { name: &'static str, value: String },
    #[error("invalid CLINIC_CORS_ORIGIN '{0}'")]
    InvalidCorsOrigin(String),
}

/// Where the SQLite document store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    InMemory,
    File(PathBuf),
}

/// Which record store backs the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Sqlite {
        database: DatabaseLocation,
    },
    Local {
        data_dir: PathBuf,
        seed_samples: bool,
    },
}

impl fmt::Display for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreConfig::Sqlite {
                database: DatabaseLocation::InMemory,
            } => write!(f, "sqlite (in-memory)"),
            StoreConfig::Sqlite {
                database: DatabaseLocation::File(path),
            } => write!(f, "sqlite ({})", path.display()),
            StoreConfig::Local { data_dir, .. } => write!(f, "local ({})", data_dir.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub store: StoreConfig,
    pub port: u16,
    pub cors_origin: HeaderValue,
}

impl ServerConfig {
    /// Read configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let store = match get("CLINIC_STORE").as_deref().unwrap_or("sqlite") {
            "sqlite" => {
                let url = get("DATABASE_URL").ok_or(ConfigError::MissingDatabaseUrl)?;
                StoreConfig::Sqlite {
                    database: parse_database_url(&url)?,
                }
            }
            "local" => StoreConfig::Local {
                data_dir: PathBuf::from(
                    get("CLINIC_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
                ),
                seed_samples: match get("CLINIC_SEED_SAMPLES") {
                    Some(value) => parse_flag("CLINIC_SEED_SAMPLES", &value)?,
                    None => false,
                },
            },
            other => return Err(ConfigError::UnknownStore(other.to_string())),
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let origin = get("CLINIC_CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
        let cors_origin =
            HeaderValue::from_str(&origin).map_err(|_| ConfigError::InvalidCorsOrigin(origin))?;

        Ok(Self {
            store,
            port,
            cors_origin,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    /// Open the configured record store and wrap it in a manager.
    pub fn open_manager(&self) -> StoreResult<ClinicManager> {
        match &self.store {
            StoreConfig::Sqlite { database } => {
                let db = match database {
                    DatabaseLocation::InMemory => Database::open_in_memory()?,
                    DatabaseLocation::File(path) => Database::open(path)?,
                };
                Ok(ClinicManager::new(db))
            }
            StoreConfig::Local {
                data_dir,
                seed_samples,
            } => {
                let mut store = LocalStore::new(FileKv::open(data_dir)?);
                if *seed_samples {
                    store.seed_sample_patients()?;
                }
                Ok(ClinicManager::new(store))
            }
        }
    }
}

/// Accepts a bare path, `sqlite://path`, `sqlite:path` or `:memory:`.
fn parse_database_url(url: &str) -> Result<DatabaseLocation, ConfigError> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);

    match path {
        "" => Err(ConfigError::MissingDatabaseUrl),
        ":memory:" => Ok(DatabaseLocation::InMemory),
        path => Ok(DatabaseLocation::File(PathBuf::from(path))),
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}
