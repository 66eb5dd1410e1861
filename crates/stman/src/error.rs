//! CLI error types with miette diagnostics.
//!
//! Maps config and API errors into user-facing errors with actionable help
//! text, and each error to a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use stman_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const CONFIG: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the Syncthing daemon at {url}")]
    #[diagnostic(
        code(stman::connection_failed),
        help(
            "Check that Syncthing is running and that the profile's hostname and port\n\
             match the GUI listen address. URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(stman::tls_error),
        help("The daemon GUI uses a self-signed certificate by default.\nRe-run `stman configure --https --insecure` to accept it.")
    )]
    TlsError { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("The daemon rejected the API key ({status})")]
    #[diagnostic(
        code(stman::auth_failed),
        help(
            "Find the key under Actions > Settings > GUI in the Syncthing web UI,\n\
             then run: stman configure -k <APIKEY>"
        )
    )]
    AuthFailed { status: u16 },

    #[error("The API key contains characters not allowed in an HTTP header")]
    #[diagnostic(code(stman::invalid_api_key), help("Re-run: stman configure -k <APIKEY>"))]
    InvalidApiKey,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(stman::not_found),
        help("Run: stman {list_command} to see configured {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(code(stman::conflict))]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    #[error("Folder '{folder}' is already shared with {device}")]
    #[diagnostic(code(stman::already_shared))]
    AlreadyShared { folder: String, device: String },

    #[error("Folder '{folder}' is not shared with {device}")]
    #[diagnostic(
        code(stman::not_shared),
        help("Run: stman folder info {folder} to see who it is shared with")
    )]
    NotShared { folder: String, device: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Syncthing API error ({status}): {message}")]
    #[diagnostic(code(stman::api_error))]
    ApiError { status: u16, message: String },

    #[error("Request to the daemon failed: {source}")]
    #[diagnostic(code(stman::transport), help("Run with -vv to log each request."))]
    Transport {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Unexpected response from the daemon: {message}")]
    #[diagnostic(
        code(stman::protocol),
        help("Run with -vvv to log the raw response body.")
    )]
    Protocol { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(stman::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(stman::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: stman configure --name {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No default profile is set")]
    #[diagnostic(
        code(stman::no_default),
        help("Pick one with --device <PROFILE>, or run: stman configure --name <PROFILE> --default")
    )]
    NoDefault,

    #[error("Configuration file not found")]
    #[diagnostic(
        code(stman::no_config),
        help(
            "Create one with: stman configure\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Could not find the daemon's API key automatically")]
    #[diagnostic(
        code(stman::api_key_discovery),
        help(
            "Pass it explicitly: stman configure -k <APIKEY>\n\
             Searched: {searched}"
        )
    )]
    ApiKeyDiscovery { searched: String },

    #[error(transparent)]
    #[diagnostic(code(stman::config))]
    Config(ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(stman::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::InvalidApiKey => exit_code::AUTH,
            Self::NotFound { .. } | Self::NotShared { .. } | Self::ApiError { status: 404, .. } => {
                exit_code::NOT_FOUND
            }
            Self::Conflict { .. } | Self::AlreadyShared { .. } => exit_code::CONFLICT,
            Self::Validation { .. } => exit_code::USAGE,
            Self::ProfileNotFound { .. }
            | Self::NoDefault
            | Self::NoConfig { .. }
            | Self::ApiKeyDiscovery { .. }
            | Self::Config(_) => exit_code::CONFIG,
            _ => exit_code::GENERAL,
        }
    }

    pub fn not_found(resource_type: &str, identifier: &str) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
            list_command: format!("{resource_type} list"),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => Self::NoConfig {
                path: path.display().to_string(),
            },
            ConfigError::ProfileNotFound { name, available } => {
                Self::ProfileNotFound { name, available }
            }
            ConfigError::NoDefault => Self::NoDefault,
            ConfigError::ApiKeyDiscovery { searched } => Self::ApiKeyDiscovery { searched },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

// ── API Error → CliError mapping ─────────────────────────────────────

impl From<stman_api::Error> for CliError {
    fn from(err: stman_api::Error) -> Self {
        use stman_api::Error as Api;

        match err {
            Api::Connection { url, source } => Self::ConnectionFailed {
                url,
                source: Box::new(source),
            },
            Api::Tls(message) => Self::TlsError { message },
            Api::InvalidApiKey => Self::InvalidApiKey,
            Api::Api { status, .. } if status == 401 || status == 403 => {
                Self::AuthFailed { status }
            }
            Api::Api { status, message } => Self::ApiError { status, message },
            Api::InvalidDeviceId { id, reason } => Self::Validation {
                field: "device ID".into(),
                reason: format!("{id}: {reason}"),
            },
            Api::Protocol { message, .. } => Self::Protocol { message },
            Api::Conflict { kind, id } => Self::Conflict {
                resource_type: kind.into(),
                identifier: id,
            },
            Api::AlreadyShared { folder, device } => Self::AlreadyShared { folder, device },
            Api::NotShared { folder, device } => Self::NotShared { folder, device },
            Api::Transport(e) => Self::Transport {
                source: Box::new(e),
            },
            Api::InvalidUrl(e) => Self::Validation {
                field: "URL".into(),
                reason: e.to_string(),
            },
        }
    }
}
