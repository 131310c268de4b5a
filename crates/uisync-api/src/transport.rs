// Shared transport configuration for building reqwest::Client instances.
//
// The NMS, CRM, RouterOS and healthcheck clients share TLS, timeout, and
// connection pool settings through this module.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::error::Error;

/// Default per-request timeout. RouterOS and UISP both answer list
/// queries well inside this on a healthy link.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default idle connections kept per host; matches the bulk worker bound.
pub const DEFAULT_POOL_SIZE: usize = 10;

/// TLS verification mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (routers ship with self-signed certs).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    /// Idle connections kept alive per host. The bulk mutator sizes this
    /// to its worker count so every worker reuses a pooled connection.
    pub pool_size: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: DEFAULT_TIMEOUT,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        self.build_client_with_headers(HeaderMap::new())
    }

    /// Build a `reqwest::Client` with additional default headers.
    ///
    /// Used by the UISP clients to inject their auth token headers.
    pub fn build_client_with_headers(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .pool_max_idle_per_host(self.pool_size)
            .user_agent(concat!("uisync/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// Normalize a user-supplied base URL and append a fixed API prefix.
///
/// `https://host` + `nms/api/v2.1` -> `https://host/nms/api/v2.1/`.
/// If the path already ends with the prefix segments it is left alone, so
/// both the bare host and the full API root are accepted in config files.
pub(crate) fn api_base_url(raw: &str, prefix: &str) -> Result<url::Url, Error> {
    let mut url = url::Url::parse(raw)?;
    let path = url.path().trim_end_matches('/').to_owned();
    let prefix = prefix.trim_matches('/');

    if path == prefix || path.ends_with(&format!("/{prefix}")) {
        url.set_path(&format!("{path}/"));
    } else {
        url.set_path(&format!("{path}/{prefix}/"));
    }

    Ok(url)
}
