// RouterOS REST API client
//
// Wraps `reqwest::Client` with the MikroTik `/rest/` base path, HTTP Basic
// auth, and RouterOS error-body parsing. The client is cheap to clone:
// clones share one connection pool, which is how the bulk mutator's
// workers reuse connections.

pub mod models;

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::{TransportConfig, api_base_url};

use self::models::{AddressListItem, NewAddressListItem, RouterOsErrorBody};

pub const REST_PREFIX: &str = "rest";
const ADDRESS_LIST_PATH: &str = "ip/firewall/address-list";

#[derive(Debug)]
struct BasicAuth {
    username: String,
    password: SecretString,
}

/// Async client for the RouterOS v7 REST API.
#[derive(Debug, Clone)]
pub struct RouterOsClient {
    http: reqwest::Client,
    base_url: Url,
    auth: Arc<BasicAuth>,
}

impl RouterOsClient {
    /// Build from the router URL (e.g. `https://192.168.88.1`) and credentials.
    pub fn new(
        base_url: &str,
        username: &str,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, username, password, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(
        base_url: &str,
        username: &str,
        password: SecretString,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: api_base_url(base_url, REST_PREFIX)?,
            auth: Arc::new(BasicAuth {
                username: username.to_owned(),
                password,
            }),
        })
    }

    /// The resolved API root (`…/rest/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.auth.username, Some(self.auth.password.expose_secret()))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, Error> {
        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    async fn send_empty(&self, builder: reqwest::RequestBuilder) -> Result<(), Error> {
        let resp = builder.send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::Authentication {
                message: "router rejected the username or password".into(),
            };
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<RouterOsErrorBody>(&raw) {
            Ok(RouterOsErrorBody {
                detail: Some(detail),
                ..
            }) => detail,
            Ok(RouterOsErrorBody {
                message: Some(message),
                ..
            }) => message,
            _ if raw.is_empty() => status.to_string(),
            _ => raw.chars().take(200).collect(),
        };

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }

    // ── Address lists ────────────────────────────────────────────────

    /// Fetch address-list rows, optionally restricted to one list.
    pub async fn get_address_list(
        &self,
        list: Option<&str>,
    ) -> Result<Vec<AddressListItem>, Error> {
        let url = self.base_url.join(ADDRESS_LIST_PATH)?;
        debug!("GET {url} list={list:?}");

        let mut builder = self.request(reqwest::Method::GET, url);
        if let Some(list) = list {
            builder = builder.query(&[("list", list)]);
        }
        self.send_json(builder).await
    }

    /// Look up the rows for one address on one list.
    ///
    /// This is the single-shot entry-id lookup; the bulk path fetches the
    /// whole table once instead.
    pub async fn find_address_list_items(
        &self,
        list: &str,
        address: &str,
    ) -> Result<Vec<AddressListItem>, Error> {
        let url = self.base_url.join(ADDRESS_LIST_PATH)?;
        debug!("GET {url} list={list} address={address}");

        let builder = self
            .request(reqwest::Method::GET, url)
            .query(&[("list", list), ("address", address)]);
        self.send_json(builder).await
    }

    /// Create an address-list row. Returns the row as the router stored it.
    pub async fn add_address_to_list(
        &self,
        address: &str,
        list: &str,
        comment: &str,
    ) -> Result<AddressListItem, Error> {
        let url = self.base_url.join(ADDRESS_LIST_PATH)?;
        debug!("PUT {url} address={address} list={list}");

        let builder = self
            .request(reqwest::Method::PUT, url)
            .json(&NewAddressListItem {
                list,
                address,
                comment,
            });
        self.send_json(builder).await
    }

    /// Delete an address-list row by its router-assigned id.
    pub async fn remove_address_from_list(&self, entry_id: &str) -> Result<(), Error> {
        let url = self.base_url.join(&format!("{ADDRESS_LIST_PATH}/{entry_id}"))?;
        debug!("DELETE {url}");

        self.send_empty(self.request(reqwest::Method::DELETE, url))
            .await
            .inspect(|_| trace!(entry_id, "address-list row deleted"))
    }
}
