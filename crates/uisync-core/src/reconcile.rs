// ── Reconciler ──
//
// Per-category set difference between the UISP view and the router view,
// keyed purely on IP address. Comments, names, and statuses never take
// part in identity.

use std::collections::HashSet;
use std::net::IpAddr;

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{
    AddressAddition, AddressRemoval, Addressed, ListCategory, ManagementAddress,
    RouterAddressEntry,
};

/// Deduplicate by IP, keeping first-seen order and last-seen attributes.
/// Records without an IP are dropped.
fn keyed<'a, A: Addressed + 'a>(
    records: impl IntoIterator<Item = &'a A>,
) -> IndexMap<IpAddr, &'a A> {
    let mut map = IndexMap::new();
    for record in records {
        if let Some(ip) = record.ip() {
            map.insert(ip, record);
        }
    }
    map
}

/// Records of `from` whose IP appears nowhere in `against`.
pub fn missing_by_ip<'a, 'b, A, B>(
    from: impl IntoIterator<Item = &'a A>,
    against: impl IntoIterator<Item = &'b B>,
) -> Vec<&'a A>
where
    A: Addressed + 'a,
    B: Addressed + 'b,
{
    let present: HashSet<IpAddr> = against.into_iter().filter_map(Addressed::ip).collect();
    keyed(from)
        .into_iter()
        .filter(|(ip, _)| !present.contains(ip))
        .map(|(_, record)| record)
        .collect()
}

/// Management records belonging to `category`. Null-IP records are kept
/// here and excluded later by the difference itself.
pub fn filter_by_category(
    addresses: &[ManagementAddress],
    category: ListCategory,
) -> Vec<&ManagementAddress> {
    addresses
        .iter()
        .filter(|a| category.admits(a.service_status))
        .collect()
}

/// Outcome of reconciling one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub category: ListCategory,
    /// In UISP for this category, absent from the router list.
    pub missing_from_router: Vec<ManagementAddress>,
    /// On the router list, absent from UISP for this category.
    pub missing_from_management: Vec<RouterAddressEntry>,
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.missing_from_router.is_empty() && self.missing_from_management.is_empty()
    }

    pub fn additions(&self) -> Vec<AddressAddition> {
        self.missing_from_router
            .iter()
            .filter_map(|a| {
                Some(AddressAddition {
                    ip_address: a.ip_address?,
                    category: self.category,
                    comment: a.comment(),
                })
            })
            .collect()
    }

    pub fn removals(&self) -> Vec<AddressRemoval> {
        self.missing_from_management
            .iter()
            .map(|e| AddressRemoval {
                ip_address: e.ip_address,
                category: self.category,
            })
            .collect()
    }
}

/// Reconcile one category. `router` may hold entries of every list; only
/// those tagged with `category` are considered.
pub fn reconcile(
    category: ListCategory,
    management: &[ManagementAddress],
    router: &[RouterAddressEntry],
) -> Reconciliation {
    let wanted = filter_by_category(management, category);
    let current: Vec<&RouterAddressEntry> =
        router.iter().filter(|e| e.category == category).collect();

    Reconciliation {
        category,
        missing_from_router: missing_by_ip(wanted.iter().copied(), current.iter().copied())
            .into_iter()
            .cloned()
            .collect(),
        missing_from_management: missing_by_ip(current.iter().copied(), wanted.iter().copied())
            .into_iter()
            .cloned()
            .collect(),
    }
}
