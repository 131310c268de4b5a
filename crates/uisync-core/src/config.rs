// ── Runtime sync configuration ──
//
// These types describe *where* the two sides live and how hard to push
// them. They carry credential data and tuning, but never touch disk.
// The CLI resolves its config file into a `SyncConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;
use uisync_api::{TlsMode, TransportConfig};

/// Default bound on concurrent router mutations.
pub const DEFAULT_WORKERS: usize = 10;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default pause between scheduled cycles.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs, typical for RouterOS `www-ssl`).
    DangerAcceptInvalid,
}

impl TlsVerification {
    pub(crate) fn to_tls_mode(&self) -> TlsMode {
        match self {
            Self::SystemDefaults => TlsMode::System,
            Self::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            Self::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// UISP instance serving both the NMS and CRM APIs.
#[derive(Debug, Clone)]
pub struct UispConfig {
    /// Base URL, e.g. `https://uisp.example.net`.
    pub url: Url,
    /// NMS token, sent as `x-auth-token`.
    pub nms_token: SecretString,
    /// CRM app key, sent as `x-auth-app-key`.
    pub crm_token: SecretString,
    pub tls: TlsVerification,
}

/// MikroTik router exposing the RouterOS REST API.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Base URL, e.g. `https://10.0.0.1`.
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
}

/// Everything one `Syncer` needs.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub uisp: UispConfig,
    pub router: RouterConfig,
    /// Upper bound on concurrent router mutations. Also sizes the
    /// router connection pool.
    pub workers: usize,
    /// Per-request timeout, applied to every upstream call.
    pub timeout: Duration,
    /// Pause between cycles in scheduled mode.
    pub interval: Duration,
    /// Dead-man's-switch URL pinged after each successful cycle.
    pub healthcheck_url: Option<Url>,
}

impl SyncConfig {
    pub(crate) fn transport(&self, tls: &TlsVerification) -> TransportConfig {
        TransportConfig {
            tls: tls.to_tls_mode(),
            timeout: self.timeout,
            pool_size: self.workers.max(1),
        }
    }

    /// The healthcheck endpoint is third-party; it always gets strict TLS,
    /// whatever the UISP or router settings say.
    pub(crate) fn healthcheck_transport(&self) -> TransportConfig {
        TransportConfig {
            pool_size: 1,
            ..self.transport(&TlsVerification::SystemDefaults)
        }
    }
}
