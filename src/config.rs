//! Configuration manager for bookshelf.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::FromRef;
use serde::{Deserialize, Serialize};

use crate::AppState;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE_NAME: &str = "mydatabase";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Instance name.
    pub name: String,
    /// Address the HTTP listener binds to.
    pub address: String,
    pub port: u16,
    /// Directory holding `login.html`, `signup.html` and `book.html`.
    pub templates: PathBuf,
    /// Expose Prometheus metrics on `/metrics`.
    pub metrics: bool,
    /// Related to document store configuration.
    #[serde(skip_serializing)]
    pub storage: Storage,
    #[serde(skip_deserializing)]
    version: String,
    #[serde(skip)]
    path: PathBuf,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            name: env!("CARGO_CRATE_NAME").into(),
            address: "0.0.0.0".into(),
            port: 8000,
            templates: PathBuf::from("templates"),
            metrics: false,
            storage: Storage::default(),
            version: VERSION.to_owned(),
            path: PathBuf::default(),
        }
    }
}

/// Document store backing users and books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum Storage {
    /// MongoDB server.
    Mongodb {
        /// Connection string, e.g. `mongodb://localhost:27017`.
        #[serde(default = "default_uri")]
        uri: String,
        /// Database holding the `users` and `books` collections.
        #[serde(default = "default_database")]
        database: String,
    },
    /// Process-local store, lost on restart.
    Memory,
}

impl Default for Storage {
    fn default() -> Self {
        Storage::Mongodb {
            uri: default_uri(),
            database: default_database(),
        }
    }
}

fn default_uri() -> String {
    DEFAULT_MONGODB_URI.into()
}

fn default_database() -> String {
    DEFAULT_DATABASE_NAME.into()
}

impl FromRef<AppState> for Arc<Configuration> {
    fn from_ref(state: &AppState) -> Arc<Configuration> {
        Arc::clone(&state.config)
    }
}

impl Configuration {
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    /// Application version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Reads the `config.yaml` file from the specified path or the default
    /// location.
    ///
    /// The `PORT` environment variable takes precedence over the file.
    pub fn read(self) -> Arc<Self> {
        let file_path = if self.path.is_file() {
            self.path.clone()
        } else {
            Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
        };

        let mut config = match File::open(&file_path) {
            Ok(file) => match serde_yaml::from_reader::<_, Configuration>(file) {
                Ok(config) => config,
                Err(err) => self.error(err),
            },
            Err(err) => self.error(err),
        };

        config.version = VERSION.to_owned();
        config.path = file_path;

        if let Some(port) = std::env::var("PORT")
            .ok()
            .and_then(|port| port.parse::<u16>().ok())
        {
            config.port = port;
        }

        Arc::new(config)
    }

    /// Return a default configuration as fallback.
    fn error(&self, err: impl std::error::Error) -> Self {
        tracing::error!(error = %err, "`config.yaml` file not found or invalid");
        Self::default()
    }
}
