//! Runtime configuration read from the environment.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;

/// Which settings profile the server runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Local development defaults.
    Development,
    /// Production: the secret key must be supplied.
    Production,
}

/// Server settings.
#[derive(Clone)]
pub struct Settings {
    /// Active profile.
    pub environment: Environment,
    /// Application secret.
    pub secret_key: String,
    /// Directory holding the database and the log file.
    pub data_dir: PathBuf,
    /// `SQLite` database file.
    pub database_path: PathBuf,
    /// Log file the server appends to.
    pub log_path: PathBuf,
    /// Log at debug rather than info level.
    pub debug: bool,
    /// Listen host.
    pub host: String,
    /// Listen port.
    pub port: u16,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("environment", &self.environment)
            .field("secret_key", &"<redacted>")
            .field("data_dir", &self.data_dir)
            .field("database_path", &self.database_path)
            .field("log_path", &self.log_path)
            .field("debug", &self.debug)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value or a
    /// production-only requirement is missing.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// See [`Settings::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let environment = match lookup("COLLAB_ENV") {
            Some(value) if value.eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Development,
        };

        let secret_key = match (environment, lookup("COLLAB_SECRET_KEY")) {
            (_, Some(key)) if !key.is_empty() => key,
            (Environment::Development, _) => "dev".to_owned(),
            (Environment::Production, _) => {
                return Err(AppError::Config(
                    "COLLAB_SECRET_KEY must be set in production".to_owned(),
                ));
            }
        };

        let data_dir = lookup("COLLAB_DIR").map_or_else(
            || {
                lookup("HOME")
                    .map_or_else(|| PathBuf::from("."), PathBuf::from)
                    .join("collab")
            },
            PathBuf::from,
        );

        let database_file = match environment {
            Environment::Development => "collab-dev.sqlite",
            Environment::Production => "collab.sqlite",
        };

        let port = match lookup("PORT") {
            None => 3000,
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
        };

        Ok(Self {
            environment,
            secret_key,
            database_path: data_dir.join(database_file),
            log_path: data_dir.join("collab.log"),
            data_dir,
            debug: lookup("COLLAB_DEBUG").is_some_and(|v| !v.is_empty()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port,
        })
    }

    /// Creates the data directory if it is missing.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the directory cannot be created.
    pub fn ensure_data_dir(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host:port` is not a socket address.
    pub fn listen_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
