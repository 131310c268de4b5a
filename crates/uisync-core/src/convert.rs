// ── API-to-domain type conversions ──
//
// Bridges raw `uisync_api` response types into `uisync_core::model`
// types. Router rows outside the syncer's lists, or whose address is not
// a plain host IP, are rejected with a `SkipReason` for the caller to log.

use std::net::IpAddr;

use uisync_api::{AddressListItem, CrmClientRecord};

use crate::model::{ListCategory, RouterAddressEntry};

// ── Helpers ────────────────────────────────────────────────────────

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a router-side address. RouterOS stores hosts without a prefix
/// length, but a host-length suffix (`/32`, `/128`) is accepted too.
/// Anything wider is a subnet and yields `None`.
pub fn parse_host_address(raw: &str) -> Option<IpAddr> {
    let raw = raw.trim();
    match raw.split_once('/') {
        None => raw.parse().ok(),
        Some((host, prefix)) => {
            let ip: IpAddr = host.parse().ok()?;
            let host_len = if ip.is_ipv4() { "32" } else { "128" };
            (prefix == host_len).then_some(ip)
        }
    }
}

/// Parse a UISP device address, dropping any prefix length.
pub fn parse_device_address(raw: &str) -> Option<IpAddr> {
    raw.split('/').next().and_then(|host| host.trim().parse().ok())
}

// ── Client ─────────────────────────────────────────────────────────

/// `"<first> <last>"`, falling back to the company name and finally to
/// `"Client <id>"` when the CRM record carries no name at all.
pub fn client_display_name(client: &CrmClientRecord) -> String {
    let person: Vec<&str> = [client.first_name.as_deref(), client.last_name.as_deref()]
        .into_iter()
        .filter_map(non_blank)
        .collect();

    if !person.is_empty() {
        return person.join(" ");
    }
    non_blank(client.company_name.as_deref())
        .map_or_else(|| format!("Client {}", client.id), ToOwned::to_owned)
}

// ── Router entry ───────────────────────────────────────────────────

/// Why a router row did not become a `RouterAddressEntry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The row belongs to a list the syncer does not own.
    ForeignList,
    /// The address is a subnet, range, or DNS name.
    NotAHost,
}

impl TryFrom<&AddressListItem> for RouterAddressEntry {
    type Error = SkipReason;

    fn try_from(item: &AddressListItem) -> Result<Self, Self::Error> {
        let category = ListCategory::from_list_name(&item.list).ok_or(SkipReason::ForeignList)?;
        let ip_address = parse_host_address(&item.address).ok_or(SkipReason::NotAHost)?;
        Ok(Self {
            ip_address,
            category,
            comment: item.comment.clone(),
            entry_id: Some(item.id.clone()).filter(|id| !id.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(first: Option<&str>, last: Option<&str>, company: Option<&str>) -> CrmClientRecord {
        serde_json::from_value(serde_json::json!({
            "id": 7,
            "firstName": first,
            "lastName": last,
            "companyName": company,
        }))
        .expect("valid client record")
    }

    fn item(list: &str, address: &str) -> AddressListItem {
        serde_json::from_value(serde_json::json!({
            ".id": "*4",
            "list": list,
            "address": address,
            "comment": "Jane Smith - 2_102",
        }))
        .expect("valid address-list row")
    }

    #[test]
    fn display_name_prefers_person() {
        assert_eq!(client_display_name(&client(Some("John"), Some("Doe"), None)), "John Doe");
        assert_eq!(client_display_name(&client(Some("Cher"), None, None)), "Cher");
    }

    #[test]
    fn display_name_falls_back() {
        assert_eq!(
            client_display_name(&client(None, Some(" "), Some("Acme Ltd"))),
            "Acme Ltd"
        );
        assert_eq!(client_display_name(&client(None, None, None)), "Client 7");
    }

    #[test]
    fn device_address_drops_prefix() {
        assert_eq!(
            parse_device_address("192.168.1.10/24"),
            Some("192.168.1.10".parse().expect("valid ip"))
        );
        assert_eq!(parse_device_address("not-an-ip"), None);
    }

    #[test]
    fn host_address_rejects_subnets() {
        assert!(parse_host_address("10.0.0.1").is_some());
        assert!(parse_host_address("10.0.0.1/32").is_some());
        assert!(parse_host_address("2001:db8::1/128").is_some());
        assert_eq!(parse_host_address("10.0.0.0/24"), None);
        assert_eq!(parse_host_address("10.0.0.1-10.0.0.9"), None);
        assert_eq!(parse_host_address("example.com"), None);
    }

    #[test]
    fn router_row_conversion() {
        let entry = RouterAddressEntry::try_from(&item("clients_suspended", "192.168.1.30"))
            .expect("owned list");
        assert_eq!(entry.category, ListCategory::Suspended);
        assert_eq!(entry.entry_id.as_deref(), Some("*4"));
        assert_eq!(entry.comment, "Jane Smith - 2_102");

        assert_eq!(
            RouterAddressEntry::try_from(&item("blocklist", "192.168.1.30")),
            Err(SkipReason::ForeignList)
        );
        assert_eq!(
            RouterAddressEntry::try_from(&item("clients_all", "192.168.1.0/24")),
            Err(SkipReason::NotAHost)
        );
    }
}
