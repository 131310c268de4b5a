//! Configuration for the uisync binary.
//!
//! One TOML file (plus `UISYNC_` environment overrides), credential
//! resolution (env + keyring + plaintext), and translation to
//! `uisync_core::SyncConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use uisync_core::{RouterConfig, SyncConfig, TlsVerification, UispConfig};

/// Keyring service name all secrets are stored under.
pub const KEYRING_SERVICE: &str = "uisync";

const REDACTED: &str = "<redacted>";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {what} configured (set it in the config file, an env var, or the keyring)")]
    NoCredentials { what: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub uisp: UispSection,
    #[serde(default)]
    pub router: RouterSection,
    #[serde(default)]
    pub sync: SyncSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// `[uisp]`: the UISP instance (NMS + CRM share one host).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UispSection {
    /// Base URL (e.g., "https://uisp.example.net").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// NMS API token (plaintext -- prefer keyring or env var).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nms_token: Option<String>,

    /// Environment variable name containing the NMS token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nms_token_env: Option<String>,

    /// CRM app key. Falls back to the NMS token when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crm_token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub crm_token_env: Option<String>,

    #[serde(default)]
    pub insecure: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

/// `[router]`: the MikroTik REST endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RouterSection {
    /// Base URL (e.g., "https://10.0.0.1").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Password (plaintext -- prefer keyring or env var).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// RouterOS ships a self-signed certificate for `www-ssl`.
    #[serde(default)]
    pub insecure: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

/// `[sync]`: scheduling and concurrency.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncSection {
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,

    #[serde(default = "default_workers")]
    pub workers: usize,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pinged after every successful cycle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthcheck_url: Option<String>,
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            workers: default_workers(),
            timeout_secs: default_timeout_secs(),
            healthcheck_url: None,
        }
    }
}

fn default_interval_minutes() -> u64 {
    5
}
fn default_workers() -> usize {
    10
}
fn default_timeout_secs() -> u64 {
    10
}

/// `[logging]`: stderr level and optional rolling log file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSection {
    /// Directory for the daily-rolling `sync.log`. Unset disables file logging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            directory: None,
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "uisync", "uisync").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("uisync");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load config from `path` (missing file is fine) layered under `UISYNC_`
/// env vars. Nested keys use `__`: `UISYNC_ROUTER__URL`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("UISYNC_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config from the platform path.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_secret(entry_name: &str) -> Option<SecretString> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, entry_name).ok()?;
    entry.get_password().ok().map(SecretString::from)
}

/// First hit wins: `env_var` -> keyring `uisync/<entry_name>` -> plaintext.
pub fn resolve_secret(
    env_var: Option<&str>,
    entry_name: &str,
    plaintext: Option<&str>,
) -> Option<SecretString> {
    // 1. Named env var
    if let Some(name) = env_var {
        if let Ok(val) = std::env::var(name) {
            if !val.is_empty() {
                return Some(SecretString::from(val));
            }
        }
    }

    // 2. System keyring
    if let Some(secret) = keyring_secret(entry_name) {
        return Some(secret);
    }

    // 3. Plaintext in config
    plaintext
        .filter(|s| !s.is_empty())
        .map(|s| SecretString::from(s.to_owned()))
}

// ── Translation ─────────────────────────────────────────────────────

fn require_url(field: &str, raw: Option<&str>) -> Result<Url, ConfigError> {
    let raw = raw
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ConfigError::Validation {
            field: field.into(),
            reason: "missing".into(),
        })?;
    let url: Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("expected http or https, got '{}'", url.scheme()),
        });
    }
    Ok(url)
}

fn tls_mode(insecure: bool, ca_cert: Option<&PathBuf>) -> TlsVerification {
    if insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(path) = ca_cert {
        TlsVerification::CustomCa(path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

fn positive(field: &str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(value)
}

impl Config {
    /// Force TLS verification off for both endpoints (`--insecure`).
    pub fn set_insecure(&mut self) {
        self.uisp.insecure = true;
        self.router.insecure = true;
    }

    /// Resolve credentials and validate into a runtime `SyncConfig`.
    pub fn to_sync_config(&self) -> Result<SyncConfig, ConfigError> {
        let uisp_url = require_url("uisp.url", self.uisp.url.as_deref())?;
        let router_url = require_url("router.url", self.router.url.as_deref())?;

        let nms_token = resolve_secret(
            self.uisp.nms_token_env.as_deref(),
            "uisp/nms-token",
            self.uisp.nms_token.as_deref(),
        )
        .ok_or_else(|| ConfigError::NoCredentials {
            what: "UISP NMS token".into(),
        })?;
        let crm_token = resolve_secret(
            self.uisp.crm_token_env.as_deref(),
            "uisp/crm-token",
            self.uisp.crm_token.as_deref(),
        )
        .unwrap_or_else(|| nms_token.clone());

        let username = self
            .router
            .username
            .clone()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ConfigError::NoCredentials {
                what: "router username".into(),
            })?;
        let password = resolve_secret(
            self.router.password_env.as_deref(),
            "router/password",
            self.router.password.as_deref(),
        )
        .ok_or_else(|| ConfigError::NoCredentials {
            what: "router password".into(),
        })?;

        let healthcheck_url = self
            .sync
            .healthcheck_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|raw| require_url("sync.healthcheck_url", Some(raw)))
            .transpose()?;

        let interval_secs = positive("sync.interval_minutes", self.sync.interval_minutes)?
            .checked_mul(60)
            .ok_or_else(|| ConfigError::Validation {
                field: "sync.interval_minutes".into(),
                reason: "is too large".into(),
            })?;

        if self.sync.workers == 0 {
            return Err(ConfigError::Validation {
                field: "sync.workers".into(),
                reason: "must be greater than zero".into(),
            });
        }

        Ok(SyncConfig {
            uisp: UispConfig {
                url: uisp_url,
                nms_token,
                crm_token,
                tls: tls_mode(self.uisp.insecure, self.uisp.ca_cert.as_ref()),
            },
            router: RouterConfig {
                url: router_url,
                username,
                password,
                tls: tls_mode(self.router.insecure, self.router.ca_cert.as_ref()),
            },
            workers: self.sync.workers,
            timeout: Duration::from_secs(positive("sync.timeout_secs", self.sync.timeout_secs)?),
            interval: Duration::from_secs(interval_secs),
            healthcheck_url,
        })
    }

    /// Copy with every plaintext secret masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mask = |s: &Option<String>| s.as_ref().map(|_| REDACTED.to_owned());
        let mut copy = self.clone();
        copy.uisp.nms_token = mask(&self.uisp.nms_token);
        copy.uisp.crm_token = mask(&self.uisp.crm_token);
        copy.router.password = mask(&self.router.password);
        copy
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    const FULL: &str = r#"
        [uisp]
        url = "https://uisp.example.net"
        nms_token = "nms-secret"

        [router]
        url = "https://10.0.0.1"
        username = "api"
        password = "router-secret"
        insecure = true

        [sync]
        interval_minutes = 2
        workers = 4
        healthcheck_url = "https://hc-ping.com/abc"

        [logging]
        directory = "/var/log/uisync"
    "#;

    #[test]
    fn defaults_apply_to_missing_file() {
        figment::Jail::expect_with(|jail| {
            let config = load_config_from(&jail.directory().join("absent.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.sync.interval_minutes, 5);
            assert_eq!(config.sync.workers, 10);
            assert_eq!(config.sync.timeout_secs, 10);
            assert_eq!(config.logging.level, "info");
            assert!(config.uisp.url.is_none());
            Ok(())
        });
    }

    #[test]
    fn file_translates_to_sync_config() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", FULL)?;
            let config = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
            let sync = config.to_sync_config().map_err(|e| e.to_string())?;

            assert_eq!(sync.uisp.url.as_str(), "https://uisp.example.net/");
            assert_eq!(sync.uisp.nms_token.expose_secret(), "nms-secret");
            // CRM token falls back to the NMS token
            assert_eq!(sync.uisp.crm_token.expose_secret(), "nms-secret");
            assert_eq!(sync.uisp.tls, TlsVerification::SystemDefaults);
            assert_eq!(sync.router.username, "api");
            assert_eq!(sync.router.password.expose_secret(), "router-secret");
            assert_eq!(sync.router.tls, TlsVerification::DangerAcceptInvalid);
            assert_eq!(sync.workers, 4);
            assert_eq!(sync.interval, Duration::from_secs(120));
            assert_eq!(sync.timeout, Duration::from_secs(10));
            assert_eq!(
                sync.healthcheck_url.as_ref().map(Url::as_str),
                Some("https://hc-ping.com/abc")
            );
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", FULL)?;
            jail.set_env("UISYNC_ROUTER__URL", "https://10.9.9.9");
            jail.set_env("UISYNC_SYNC__WORKERS", "20");
            jail.set_env("UISYNC_CRM_KEY", "crm-from-env");
            jail.set_env("UISYNC_UISP__CRM_TOKEN_ENV", "UISYNC_CRM_KEY");

            let config = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
            let sync = config.to_sync_config().map_err(|e| e.to_string())?;

            assert_eq!(sync.router.url.as_str(), "https://10.9.9.9/");
            assert_eq!(sync.workers, 20);
            assert_eq!(sync.uisp.crm_token.expose_secret(), "crm-from-env");
            Ok(())
        });
    }

    #[test]
    fn missing_router_password_is_reported() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [uisp]
                url = "https://uisp.example.net"
                nms_token = "nms-secret"
                [router]
                url = "https://10.0.0.1"
                username = "api"
                "#,
            )?;
            let config = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
            match config.to_sync_config() {
                Err(ConfigError::NoCredentials { what }) => assert_eq!(what, "router password"),
                other => panic!("expected NoCredentials, got {other:?}"),
            }
            Ok(())
        });
    }

    #[test]
    fn invalid_values_fail_validation() {
        let mut config: Config = toml::from_str(FULL).expect("valid toml");
        config.router.url = Some("ftp://10.0.0.1".into());
        assert!(matches!(
            config.to_sync_config(),
            Err(ConfigError::Validation { ref field, .. }) if field == "router.url"
        ));

        let mut config: Config = toml::from_str(FULL).expect("valid toml");
        config.sync.workers = 0;
        assert!(matches!(
            config.to_sync_config(),
            Err(ConfigError::Validation { ref field, .. }) if field == "sync.workers"
        ));
    }

    #[test]
    fn oversized_interval_fails_validation() {
        let mut config: Config = toml::from_str(FULL).expect("valid toml");
        config.sync.interval_minutes = u64::MAX / 2;
        assert!(matches!(
            config.to_sync_config(),
            Err(ConfigError::Validation { ref field, .. }) if field == "sync.interval_minutes"
        ));

        config.sync.interval_minutes = 0;
        assert!(matches!(
            config.to_sync_config(),
            Err(ConfigError::Validation { ref field, .. }) if field == "sync.interval_minutes"
        ));
    }

    #[test]
    fn insecure_flag_and_ca_cert() {
        let mut config: Config = toml::from_str(FULL).expect("valid toml");
        config.uisp.ca_cert = Some(PathBuf::from("/etc/ssl/uisp.pem"));
        let sync = config.to_sync_config().expect("valid config");
        assert_eq!(
            sync.uisp.tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/ssl/uisp.pem"))
        );

        config.set_insecure();
        let sync = config.to_sync_config().expect("valid config");
        assert_eq!(sync.uisp.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn redaction_masks_secrets() {
        let config: Config = toml::from_str(FULL).expect("valid toml");
        let shown = config.redacted().to_toml().expect("serializable");
        assert!(!shown.contains("nms-secret"));
        assert!(!shown.contains("router-secret"));
        assert!(shown.contains(REDACTED));
        assert!(shown.contains("https://10.0.0.1"));
    }

    #[test]
    fn config_path_ends_with_file_name() {
        assert!(config_path().ends_with("config.toml"));
    }
}
