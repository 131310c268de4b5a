// ── Address records on both sides of a sync ──

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use super::category::ListCategory;
use super::status::ServiceStatus;

/// Anything keyed by an IP address for reconciliation purposes.
pub trait Addressed {
    fn ip(&self) -> Option<IpAddr>;
}

/// One customer identity as UISP sees it.
///
/// `ip_address` is `None` when no service or site could be resolved. Such
/// records never reach a router list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagementAddress {
    pub ip_address: Option<IpAddr>,
    pub client_name: String,
    pub client_id: i64,
    pub service_id: Option<i64>,
    pub service_status: Option<ServiceStatus>,
}

impl ManagementAddress {
    /// Router-side comment: `"<client_name> - <client_id>_<service_id>"`.
    pub fn comment(&self) -> String {
        let service = self.service_id.map_or_else(String::new, |id| id.to_string());
        format!("{} - {}_{}", self.client_name, self.client_id, service)
    }
}

impl Addressed for ManagementAddress {
    fn ip(&self) -> Option<IpAddr> {
        self.ip_address
    }
}

/// One row of a syncer-owned router address list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterAddressEntry {
    pub ip_address: IpAddr,
    pub category: ListCategory,
    pub comment: String,
    /// Router-assigned row id (`.id`), e.g. `*1A`.
    pub entry_id: Option<String>,
}

impl RouterAddressEntry {
    pub fn list_name(&self) -> &'static str {
        self.category.list_name()
    }
}

impl Addressed for RouterAddressEntry {
    fn ip(&self) -> Option<IpAddr> {
        Some(self.ip_address)
    }
}

// ── Mutation requests ───────────────────────────────────────────────

/// An address to create on a router list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressAddition {
    pub ip_address: IpAddr,
    pub category: ListCategory,
    pub comment: String,
}

/// An address to drop from a router list, before its row id is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressRemoval {
    pub ip_address: IpAddr,
    pub category: ListCategory,
}

/// A removal whose router row id has been looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRemoval {
    pub entry_id: String,
    pub ip_address: IpAddr,
    pub category: ListCategory,
}
