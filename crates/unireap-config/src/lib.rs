//! Configuration loading for unireap.
//!
//! Reads the YAML / JSON / TOML site list (schema `0.2`, or the legacy
//! single-site JSON schema `0.1`), resolves each site's password
//! (env var + keyring + plaintext), and translates the result into a
//! `unireap_core::RunConfig`. The CLI layers its flags on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Format, Json, Toml, Yaml},
};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use unireap_core::{FailurePolicy, RoutingVariant, RunConfig, RunOptions, SiteConfig};

/// Keyring service name under which site passwords are stored.
pub const KEYRING_SERVICE: &str = "unireap";

const CURRENT_VERSION: &str = "0.2";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for {username} on {host}")]
    NoCredentials { host: String, username: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("error creating HTTP log directory {}: {source}", path.display())]
    LogDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── Format and schema selection ─────────────────────────────────────

/// Syntax of the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// Infer from the file extension.
    #[default]
    Auto,
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    /// Resolve `Auto` against the path's extension.
    pub fn resolve(self, path: &Path) -> Result<Self, ConfigError> {
        if self != Self::Auto {
            return Ok(self);
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(invalid(
                "config-type",
                format!(
                    "cannot infer format of {}; pass --config-type",
                    path.display()
                ),
            )),
        }
    }
}

/// Layout of the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaVersion {
    /// A single site object at the top level. JSON only.
    V0_1,
    /// `{version, httpLogDirectory, continueOnError, sites: [...]}`.
    #[default]
    V0_2,
}

// ── File schema ─────────────────────────────────────────────────────

/// Top-level configuration file (schema `0.2`).
///
/// Keys are camelCase; the PascalCase spellings accepted by earlier
/// releases of the tool still parse.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(default, alias = "Version")]
    pub version: Option<String>,

    /// Directory for raw HTTP transcripts. Created when missing.
    #[serde(default, alias = "HttpLogDirectory")]
    pub http_log_directory: Option<PathBuf>,

    /// Keep going with the next site after one fails.
    #[serde(default, alias = "ContinueOnError")]
    pub continue_on_error: bool,

    #[serde(default, alias = "Sites")]
    pub sites: Vec<SiteEntry>,
}

/// One `sites[]` entry, or the whole file under schema `0.1`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteEntry {
    /// Controller root URL, e.g. `https://unifi.example.com:8443`.
    #[serde(default, alias = "Host")]
    pub host: String,

    #[serde(default = "default_site", alias = "Site")]
    pub site: String,

    #[serde(default, alias = "Username")]
    pub username: String,

    /// Plaintext password. Prefer `passwordEnv` or the keyring.
    #[serde(default, alias = "Password")]
    pub password: Option<String>,

    /// Name of an environment variable holding the password.
    #[serde(default, alias = "PasswordEnv")]
    pub password_env: Option<String>,

    /// `true` for UniFi OS gateways (UDM, UDM Pro, UDR, Cloud Key Gen2+).
    #[serde(default, alias = "Udmp")]
    pub udmp: bool,

    /// Verify the controller's TLS certificate. Only an explicit `false`
    /// turns verification off.
    #[serde(default = "default_true", alias = "ValidateCertificate")]
    pub validate_certificate: bool,

    #[serde(default, alias = "TimeoutSecs")]
    pub timeout_secs: Option<u64>,
}

impl Default for SiteEntry {
    fn default() -> Self {
        Self {
            host: String::new(),
            site: default_site(),
            username: String::new(),
            password: None,
            password_env: None,
            udmp: false,
            validate_certificate: true,
            timeout_secs: None,
        }
    }
}

fn default_site() -> String {
    "default".into()
}

fn default_true() -> bool {
    true
}

// ── Config file path ────────────────────────────────────────────────

/// Default config file location via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "unireap", "unireap").map_or_else(
        || PathBuf::from("config.yaml"),
        |dirs| dirs.config_dir().join("config.yaml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Parse the configuration file without resolving credentials.
pub fn load_file(
    path: &Path,
    format: ConfigFormat,
    version: SchemaVersion,
) -> Result<ConfigFile, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let format = format.resolve(path)?;
    debug!(path = %path.display(), ?format, ?version, "loading configuration");

    let figment = match format {
        ConfigFormat::Yaml => Figment::from(Yaml::file(path)),
        ConfigFormat::Toml => Figment::from(Toml::file(path)),
        ConfigFormat::Json | ConfigFormat::Auto => Figment::from(Json::file(path)),
    };

    match version {
        SchemaVersion::V0_1 => {
            if format != ConfigFormat::Json {
                return Err(invalid(
                    "config-version",
                    "version 0.1 configuration files must be JSON",
                ));
            }
            let site: SiteEntry = figment.extract()?;
            Ok(ConfigFile {
                version: Some("0.1".into()),
                sites: vec![site],
                ..ConfigFile::default()
            })
        }
        SchemaVersion::V0_2 => {
            let file: ConfigFile = figment.extract()?;
            if let Some(declared) = file.version.as_deref().filter(|v| *v != CURRENT_VERSION) {
                warn!(declared, "configuration declares an unknown version, reading as 0.2");
            }
            Ok(file)
        }
    }
}

/// Load, validate, and translate the configuration into a [`RunConfig`].
pub fn load_run_config(
    path: &Path,
    format: ConfigFormat,
    version: SchemaVersion,
) -> Result<RunConfig, ConfigError> {
    let file = load_file(path, format, version)?;
    to_run_config(&file)
}

/// Translate a parsed file into a [`RunConfig`].
///
/// Resolves every site's password and creates the HTTP log directory.
pub fn to_run_config(file: &ConfigFile) -> Result<RunConfig, ConfigError> {
    if file.sites.is_empty() {
        return Err(invalid("sites", "no sites configured"));
    }

    let sites = file
        .sites
        .iter()
        .enumerate()
        .map(|(index, entry)| site_config(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    let transcript_dir = file
        .http_log_directory
        .as_deref()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(ensure_log_directory)
        .transpose()?;

    let failure_policy = if file.continue_on_error {
        FailurePolicy::ContinueWithNextSite
    } else {
        FailurePolicy::AbortRun
    };

    Ok(RunConfig {
        sites,
        options: RunOptions {
            transcript_dir,
            ..RunOptions::default()
        },
        failure_policy,
    })
}

fn site_config(index: usize, entry: &SiteEntry) -> Result<SiteConfig, ConfigError> {
    let field = |name: &str| format!("sites[{index}].{name}");

    if entry.host.trim().is_empty() {
        return Err(invalid(field("host"), "must not be empty"));
    }
    let controller: url::Url = entry
        .host
        .trim()
        .parse()
        .map_err(|e| invalid(field("host"), format!("invalid URL '{}': {e}", entry.host)))?;
    if !matches!(controller.scheme(), "http" | "https") {
        return Err(invalid(
            field("host"),
            format!("expected an http or https URL, got '{}'", entry.host),
        ));
    }

    if entry.username.is_empty() {
        return Err(invalid(field("username"), "must not be empty"));
    }
    if entry.site.is_empty() {
        return Err(invalid(field("site"), "must not be empty"));
    }

    let timeout = match entry.timeout_secs {
        Some(0) => return Err(invalid(field("timeoutSecs"), "must be greater than zero")),
        Some(secs) => Some(Duration::from_secs(secs)),
        None => None,
    };

    let password = resolve_password(entry)?;

    Ok(SiteConfig {
        controller,
        routing: RoutingVariant::from_udmp(entry.udmp),
        site: entry.site.clone(),
        username: entry.username.clone(),
        password,
        verify_tls: entry.validate_certificate,
        timeout,
    })
}

fn ensure_log_directory(dir: &Path) -> Result<PathBuf, ConfigError> {
    if !dir.is_dir() {
        debug!(path = %dir.display(), "creating HTTP log directory");
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::LogDirectory {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    Ok(dir.to_path_buf())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve a site's password: `passwordEnv`, then keyring, then plaintext.
pub fn resolve_password(entry: &SiteEntry) -> Result<SecretString, ConfigError> {
    resolve_password_with(entry, |name| std::env::var(name).ok())
}

fn resolve_password_with(
    entry: &SiteEntry,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Named env var
    if let Some(ref name) = entry.password_env {
        if let Some(val) = env(name) {
            return Ok(SecretString::from(val));
        }
        debug!(var = %name, "password env var not set");
    }

    // 2. System keyring
    if let Ok(keyring_entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(entry)) {
        if let Ok(pw) = keyring_entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = entry.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        host: entry.host.clone(),
        username: entry.username.clone(),
    })
}

/// Keyring account name for a site: `{host}/{username}`.
pub fn keyring_user(entry: &SiteEntry) -> String {
    format!("{}/{}", entry.host.trim_end_matches('/'), entry.username)
}
