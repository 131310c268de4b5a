// Dead-man's-switch ping (healthchecks.io and compatible services).

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Pings a fixed check URL after each successful sync cycle.
#[derive(Debug, Clone)]
pub struct HealthcheckClient {
    http: reqwest::Client,
    url: Url,
}

impl HealthcheckClient {
    pub fn new(url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            url: Url::parse(url)?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Send the ping. Any non-2xx answer is an error.
    pub async fn ping(&self) -> Result<(), Error> {
        debug!("GET {}", self.url);
        let resp = self.http.get(self.url.clone()).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Api {
                status: status.as_u16(),
                message: format!("healthcheck ping rejected: {status}"),
            })
        }
    }
}
