// UISP response types
//
// Models for the UISP network-management (NMS) and CRM APIs. Only the
// fields the sync needs are modelled; everything else lands in `extra`.
// Fields use `#[serde(default)]` liberally because UISP omits or nulls
// them depending on device type and firmware.

use serde::{Deserialize, Serialize};

// ── CRM: clients ─────────────────────────────────────────────────────

/// Client record from `GET clients`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmClientRecord {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Set for company accounts, where first/last name are usually null.
    #[serde(default)]
    pub company_name: Option<String>,
    /// Client account status (not the service status).
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── CRM: services ────────────────────────────────────────────────────

/// Service record from `GET clients/services`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmService {
    pub id: i64,
    pub client_id: i64,
    /// Numeric service status code (0=prepared, 1=active, 3=suspended, ...).
    #[serde(default)]
    pub status: Option<i64>,
    /// NMS site the service is provisioned on.
    #[serde(default)]
    pub unms_client_site_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── NMS: devices ─────────────────────────────────────────────────────

/// Device record from `GET devices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NmsDevice {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub identification: Option<DeviceIdentification>,
    /// Management address, usually with a prefix length (`10.0.0.5/24`).
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `identification` block nested inside `NmsDevice`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceIdentification {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub site: Option<SiteRef>,
}

/// Site reference nested inside the device identification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteRef {
    #[serde(default)]
    pub id: Option<String>,
}

impl NmsDevice {
    /// Display name for log lines.
    pub fn display_name(&self) -> &str {
        self.identification
            .as_ref()
            .and_then(|i| i.name.as_deref())
            .unwrap_or("Unknown device")
    }

    /// The site this device is assigned to, if the record carries one.
    pub fn site_id(&self) -> Option<&str> {
        self.identification
            .as_ref()
            .and_then(|i| i.site.as_ref())
            .and_then(|s| s.id.as_deref())
    }
}
