use crate::errors::{BaleenError, BaleenResult};

pub const DEFAULT_DB_NAME: &str = "baleen";
pub const DEFAULT_DB_PORT: u16 = 27017;

/// Where the document store lives. Every value can be overridden per
/// connection through [`ConnectOptions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub name: String,
    pub host: String,
    pub port: u16,
}

/// Per-connection overrides; `None` falls back to [`DatabaseSettings`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    pub name: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl ConnectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }
}

impl DatabaseSettings {
    /// Apply overrides, keeping configured values for anything omitted
    pub fn resolve(&self, options: &ConnectOptions) -> DatabaseSettings {
        DatabaseSettings {
            name: options.name.clone().unwrap_or_else(|| self.name.clone()),
            host: options.host.clone().unwrap_or_else(|| self.host.clone()),
            port: options.port.unwrap_or(self.port),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseSettings,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> BaleenResult<Self> {
        let exe_dir = Self::exe_dir();

        // Try to load .env from executable's directory first
        if let Some(ref dir) = exe_dir {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        let name = std::env::var("BALEEN_DB_NAME").unwrap_or_else(|_| DEFAULT_DB_NAME.to_string());

        // Database files live next to the executable unless told otherwise
        let host = std::env::var("BALEEN_DB_HOST").unwrap_or_else(|_| {
            exe_dir
                .map(|d| d.to_string_lossy().into_owned())
                .unwrap_or_else(|| ".".to_string())
        });

        let port = match std::env::var("BALEEN_DB_PORT") {
            Ok(raw) => parse_port(&raw)?,
            Err(_) => DEFAULT_DB_PORT,
        };

        Ok(Self {
            database: DatabaseSettings { name, host, port },
        })
    }
}

fn parse_port(raw: &str) -> BaleenResult<u16> {
    raw.trim()
        .parse()
        .map_err(|_| BaleenError::Config(format!("BALEEN_DB_PORT is not a valid port: {}", raw)))
}
