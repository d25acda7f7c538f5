//! CLI error types with miette diagnostics.
//!
//! Maps `ConfigError` and `CoreError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use unireap_config::ConfigError;
use unireap_core::CoreError;

/// Process exit codes. `USAGE` is emitted by clap itself.
#[allow(dead_code)]
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const CONFIG: i32 = 10;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file not found")]
    #[diagnostic(
        code(unireap::no_config),
        help(
            "Expected at: {path}\n\
             Pass --config <PATH> or set UNIREAP_CONFIG."
        )
    )]
    NoConfig { path: String },

    #[error("No password found for {username} on {host}")]
    #[diagnostic(
        code(unireap::no_credentials),
        help(
            "Set `password`, point `passwordEnv` at an environment variable,\n\
             or store it in the system keyring under service 'unireap',\n\
             account '{host}/{username}'."
        )
    )]
    NoCredentials { host: String, username: String },

    #[error(transparent)]
    #[diagnostic(code(unireap::config))]
    Config(ConfigError),

    // ── Site failures ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(unireap::auth_failed),
        help("Check the site's username and password, and whether it is a UniFi OS gateway (udmp).")
    )]
    AuthFailed(CoreError),

    #[error(transparent)]
    #[diagnostic(
        code(unireap::connection_failed),
        help(
            "Check that the controller is running and reachable.\n\
             Self-signed certificates need validateCertificate: false."
        )
    )]
    ConnectionFailed(CoreError),

    #[error(transparent)]
    #[diagnostic(code(unireap::site_failed))]
    SiteFailed(CoreError),

    // ── Serialization ────────────────────────────────────────────────
    #[error("Failed to render JSON report: {0}")]
    #[diagnostic(code(unireap::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML report: {0}")]
    #[diagnostic(code(unireap::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoConfig { .. } | Self::Config(_) => exit_code::CONFIG,
            Self::NoCredentials { .. } | Self::AuthFailed(_) => exit_code::AUTH,
            Self::ConnectionFailed(_) => exit_code::CONNECTION,
            Self::SiteFailed(_) | Self::Json(_) | Self::Yaml(_) => exit_code::GENERAL,
        }
    }
}

// ── Upstream error mapping ───────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => Self::NoConfig {
                path: path.display().to_string(),
            },
            ConfigError::NoCredentials { host, username } => {
                Self::NoCredentials { host, username }
            }
            other => Self::Config(other),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        if err.is_auth_failure() {
            Self::AuthFailed(err)
        } else if err.is_connection_failure() {
            Self::ConnectionFailed(err)
        } else {
            Self::SiteFailed(err)
        }
    }
}
