//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use uisync_config::ConfigError;
use uisync_core::CoreError;

/// Process exit codes. Usage errors exit with 2 straight from clap.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const CONFIG: i32 = 10;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}: {reason}")]
    #[diagnostic(
        code(uisync::connection_failed),
        help(
            "Check that UISP and the router are reachable and that the RouterOS\n\
             `www-ssl` (or `www`) service is enabled.\n\
             Self-signed certificate? Try: --insecure"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(uisync::timeout),
        help("Raise sync.timeout_secs or check the responsiveness of the endpoint.")
    )]
    Timeout { url: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(uisync::auth_failed),
        help(
            "Verify uisp.nms_token / uisp.crm_token and the router username and password.\n\
             The router user needs the `read`, `write`, and `rest-api` policies."
        )
    )]
    AuthFailed { message: String },

    #[error("No {what} configured")]
    #[diagnostic(
        code(uisync::no_credentials),
        help(
            "Set it in the config file, point a *_env key at an environment variable,\n\
             or store it in the system keyring under service `uisync`."
        )
    )]
    NoCredentials { what: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(uisync::api_error))]
    ApiError { message: String },

    #[error("Internal error: {0}")]
    #[diagnostic(code(uisync::internal))]
    Internal(String),

    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid configuration value for {field}: {reason}")]
    #[diagnostic(
        code(uisync::invalid_config),
        help("Check the config file (see: uisync config path) and UISYNC_* environment variables.")
    )]
    InvalidConfig { field: String, reason: String },

    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(uisync::no_config),
        help("Create it, or drop --config to use the default location.")
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(uisync::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::InvalidConfig { .. } | Self::NoConfig { .. } | Self::Config(_) => {
                exit_code::CONFIG
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::Timeout { url } => Self::Timeout { url },
            CoreError::Api { message, status } => Self::ApiError {
                message: match status {
                    Some(code) => format!("HTTP {code}: {message}"),
                    None => message,
                },
            },
            CoreError::Config { message } => Self::InvalidConfig {
                field: "url".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::InvalidConfig { field, reason },
            ConfigError::NoCredentials { what } => Self::NoCredentials { what },
            ConfigError::Figment(e) => Self::Config(e),
            ConfigError::Serialization(e) => Self::Render(e.to_string()),
            ConfigError::Io(e) => Self::Io(e),
        }
    }
}
