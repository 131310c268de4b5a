// UISP API clients
//
// UISP exposes two REST surfaces on the same host: the network-management
// API under `/nms/api/v2.1/` (devices, sites) and the CRM API under
// `/crm/api/v1.0/` (clients, services). They authenticate with different
// headers, so each gets its own client over a shared request helper.

pub mod models;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::{TransportConfig, api_base_url};

use self::models::{CrmClientRecord, CrmService, NmsDevice};

pub const NMS_API_PREFIX: &str = "nms/api/v2.1";
pub const CRM_API_PREFIX: &str = "crm/api/v1.0";

// ── Shared request plumbing ─────────────────────────────────────────

#[derive(Debug, Clone)]
struct UispHttp {
    http: reqwest::Client,
    base_url: Url,
}

impl UispHttp {
    fn new(
        base_url: &str,
        prefix: &str,
        header: &'static str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut value =
            HeaderValue::from_str(token.expose_secret()).map_err(|e| Error::Authentication {
                message: format!("invalid token header value: {e}"),
            })?;
        value.set_sensitive(true);
        headers.insert(HeaderName::from_static(header), value);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = api_base_url(base_url, prefix)?;
        Ok(Self { http, base_url })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.base_url.join(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                message: format!("UISP rejected the API token (HTTP {status})"),
            });
        }

        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status.to_string()
                } else {
                    body.chars().take(200).collect()
                },
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }
}

// ── NMS ─────────────────────────────────────────────────────────────

/// Client for the UISP network-management API (`x-auth-token`).
#[derive(Debug, Clone)]
pub struct NmsClient {
    inner: UispHttp,
}

impl NmsClient {
    /// Build from the UISP host URL and an NMS API token.
    pub fn new(
        base_url: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            inner: UispHttp::new(base_url, NMS_API_PREFIX, "x-auth-token", token, transport)?,
        })
    }

    /// The resolved API root (`…/nms/api/v2.1/`).
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// List every device known to UISP.
    pub async fn get_devices(&self) -> Result<Vec<NmsDevice>, Error> {
        self.inner.get("devices").await
    }
}

// ── CRM ─────────────────────────────────────────────────────────────

/// Client for the UISP CRM API (`x-auth-app-key`).
#[derive(Debug, Clone)]
pub struct CrmClient {
    inner: UispHttp,
}

impl CrmClient {
    /// Build from the UISP host URL and a CRM app key.
    pub fn new(
        base_url: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            inner: UispHttp::new(base_url, CRM_API_PREFIX, "x-auth-app-key", token, transport)?,
        })
    }

    /// The resolved API root (`…/crm/api/v1.0/`).
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub async fn get_clients(&self) -> Result<Vec<CrmClientRecord>, Error> {
        self.inner.get("clients").await
    }

    pub async fn get_services(&self) -> Result<Vec<CrmService>, Error> {
        self.inner.get("clients/services").await
    }
}
