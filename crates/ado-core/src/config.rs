//! Configuration types and loading
//!
//! Everything is overridable through environment variables; defaults match
//! the directory layout the tools are deployed with in their container.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Azure DevOps connection settings
    pub connection: ConnectionConfig,

    /// Well-known directories for file exchange with the host
    pub directories: DirectoriesConfig,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Connection settings for the Azure DevOps organization
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionConfig {
    /// Organization base URL, e.g. `https://dev.azure.com/contoso`
    pub organization_url: String,
    /// Project name or id
    pub project: String,
    /// Personal access token used for authentication
    pub personal_access_token: String,
    /// REST API version
    pub api_version: String,
}

/// Well-known directories probed when resolving user-supplied file paths
/// and used as the destination for downloads.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DirectoriesConfig {
    /// Destination for downloaded attachments
    pub downloads: PathBuf,
    /// Staging area for files to upload
    pub uploads: PathBuf,
    /// Scratch directory
    pub temp: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Append-mode log file; `None` disables the file layer
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig {
                organization_url: "https://dev.azure.com/example".to_string(),
                project: String::new(),
                personal_access_token: String::new(),
                api_version: "7.1".to_string(),
            },
            directories: DirectoriesConfig::default(),
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            logging: LoggingConfig {
                file: Some(PathBuf::from("/tmp/ado_tools.log")),
            },
        }
    }
}

impl Default for DirectoriesConfig {
    fn default() -> Self {
        Self {
            downloads: PathBuf::from("/downloads"),
            uploads: PathBuf::from("/uploads"),
            temp: PathBuf::from("/tmp"),
        }
    }
}

impl DirectoriesConfig {
    /// Candidate directories in probe order.
    pub fn candidates(&self) -> [&PathBuf; 3] {
        [&self.downloads, &self.uploads, &self.temp]
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not set: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Connection
        if let Ok(url) = std::env::var("AZURE_DEVOPS_ORG_URL") {
            config.connection.organization_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(project) = std::env::var("AZURE_DEVOPS_PROJECT") {
            config.connection.project = project;
        }
        if let Ok(pat) = std::env::var("AZURE_DEVOPS_PAT") {
            config.connection.personal_access_token = pat;
        }
        if let Ok(version) = std::env::var("AZURE_DEVOPS_API_VERSION") {
            config.connection.api_version = version;
        }

        // Directories
        if let Ok(dir) = std::env::var("ADO_TOOLS_DOWNLOADS_DIR") {
            config.directories.downloads = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("ADO_TOOLS_UPLOADS_DIR") {
            config.directories.uploads = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("ADO_TOOLS_TEMP_DIR") {
            config.directories.temp = PathBuf::from(dir);
        }

        // Server
        if let Ok(host) = std::env::var("HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("not a valid port number: {port}"),
            })?;
        }

        // Logging
        if let Ok(file) = std::env::var("ADO_TOOLS_LOG_FILE") {
            config.logging.file = if file.is_empty() {
                None
            } else {
                Some(PathBuf::from(file))
            };
        }

        Ok(config)
    }

    /// Get the server address
    pub fn server_addr(&self) -> std::net::SocketAddr {
        let ip: std::net::IpAddr = self.server.host.parse().unwrap_or([0, 0, 0, 0].into());
        std::net::SocketAddr::new(ip, self.server.port)
    }
}
