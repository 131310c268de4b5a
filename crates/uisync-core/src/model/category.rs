// ── Address-list categories ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::status::ServiceStatus;

/// The three router address lists the syncer owns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ListCategory {
    /// Services currently in good standing.
    Active,
    /// Services suspended for non-payment or by an operator.
    Suspended,
    /// Every resolvable address, regardless of service status.
    All,
}

impl ListCategory {
    /// Order in which a cycle walks the lists.
    pub const SYNC_ORDER: [Self; 3] = [Self::Suspended, Self::Active, Self::All];

    /// Router-side address-list name.
    pub const fn list_name(self) -> &'static str {
        match self {
            Self::Active => "clients_active",
            Self::Suspended => "clients_suspended",
            Self::All => "clients_all",
        }
    }

    /// Inverse of [`list_name`](Self::list_name). Lists the syncer does not
    /// own yield `None`.
    pub fn from_list_name(name: &str) -> Option<Self> {
        match name {
            "clients_active" => Some(Self::Active),
            "clients_suspended" => Some(Self::Suspended),
            "clients_all" => Some(Self::All),
            _ => None,
        }
    }

    /// Service status an address must carry to belong here. `None` means
    /// every address belongs.
    pub const fn status_filter(self) -> Option<ServiceStatus> {
        match self {
            Self::Active => Some(ServiceStatus::Active),
            Self::Suspended => Some(ServiceStatus::Suspended),
            Self::All => None,
        }
    }

    pub fn admits(self, status: Option<ServiceStatus>) -> bool {
        match self.status_filter() {
            None => true,
            Some(wanted) => status == Some(wanted),
        }
    }
}
