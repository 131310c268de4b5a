// ── Lookup resolvers ──
//
// Joins the three UISP collections into one `ManagementAddress` per CRM
// client: client -> first service -> service site -> first device on that
// site -> device IP. Missing links resolve to "no IP" with a warning;
// they never fail the cycle.

use std::net::{IpAddr, Ipv4Addr};
use std::ops::RangeInclusive;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};
use uisync_api::{CrmClientRecord, CrmService, NmsDevice};

use crate::convert::{client_display_name, parse_device_address};
use crate::model::{ManagementAddress, ServiceStatus};

/// First three octets of the placeholder address handed to devices
/// that report no IP (RFC 6890 IETF protocol assignments block).
pub const FALLBACK_PREFIX: [u8; 3] = [192, 0, 0];

/// Range the placeholder's last octet is drawn from.
pub const FALLBACK_OCTETS: RangeInclusive<u8> = 2..=254;

// ── Random source ──────────────────────────────────────────────────

/// Supplies the last octet of a fallback address.
///
/// Placeholders are not unique: two IP-less devices in one cycle can draw
/// the same octet and collapse into a single router entry.
pub trait OctetSource {
    fn next_octet(&mut self) -> u8;
}

/// Always yields the same octet.
#[derive(Debug, Clone, Copy)]
pub struct FixedOctet(pub u8);

impl OctetSource for FixedOctet {
    fn next_octet(&mut self) -> u8 {
        self.0
    }
}

/// `OctetSource` backed by a real RNG.
#[derive(Debug)]
pub struct RandomOctets<R>(R);

impl RandomOctets<StdRng> {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomOctets<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl<R: Rng> OctetSource for RandomOctets<R> {
    fn next_octet(&mut self) -> u8 {
        self.0.gen_range(FALLBACK_OCTETS)
    }
}

fn fallback_address(octets: &mut impl OctetSource) -> IpAddr {
    let last = octets
        .next_octet()
        .clamp(*FALLBACK_OCTETS.start(), *FALLBACK_OCTETS.end());
    let [a, b, c] = FALLBACK_PREFIX;
    IpAddr::V4(Ipv4Addr::new(a, b, c, last))
}

// ── Resolvers ──────────────────────────────────────────────────────

fn find_service(services: &[CrmService], client_id: i64) -> Option<&CrmService> {
    services.iter().find(|s| s.client_id == client_id)
}

/// Id of the client's first service.
pub fn resolve_service_id(services: &[CrmService], client_id: i64) -> Option<i64> {
    find_service(services, client_id).map(|s| s.id)
}

/// Raw status code of the client's first service.
pub fn resolve_service_status(services: &[CrmService], client_id: i64) -> Option<i64> {
    find_service(services, client_id).and_then(|s| s.status)
}

/// Walk client -> service -> site -> device and return the device IP.
///
/// A matching device without an address gets a `192.0.0.<n>` placeholder
/// from `octets`. The first device on the site wins.
pub fn resolve_client_ip(
    devices: &[NmsDevice],
    services: &[CrmService],
    client_id: i64,
    octets: &mut impl OctetSource,
) -> Option<IpAddr> {
    let Some(service) = find_service(services, client_id) else {
        warn!(client_id, "no service found for client");
        return None;
    };
    let Some(site_id) = service.unms_client_site_id.as_deref().filter(|s| !s.is_empty()) else {
        warn!(client_id, service_id = service.id, "service has no site");
        return None;
    };

    for device in devices {
        let Some(device_site) = device.site_id() else {
            warn!(
                client_id,
                device = device.display_name(),
                "device has no identification or site, skipping"
            );
            continue;
        };
        if device_site != site_id {
            continue;
        }

        return match device.ip_address.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => {
                let ip = parse_device_address(raw);
                if ip.is_none() {
                    warn!(
                        client_id,
                        device = device.display_name(),
                        raw,
                        "device IP is not parseable"
                    );
                }
                ip
            }
            None => {
                let ip = fallback_address(octets);
                warn!(
                    client_id,
                    device = device.display_name(),
                    %ip,
                    "device has no IP, assigned fallback address"
                );
                Some(ip)
            }
        };
    }

    warn!(client_id, site_id, "no device found on service site");
    None
}

/// Build one `ManagementAddress` per CRM client.
pub fn build_management_addresses(
    clients: &[CrmClientRecord],
    services: &[CrmService],
    devices: &[NmsDevice],
    octets: &mut impl OctetSource,
) -> Vec<ManagementAddress> {
    clients
        .iter()
        .map(|client| {
            let ip_address = resolve_client_ip(devices, services, client.id, octets);
            let service_status =
                resolve_service_status(services, client.id).and_then(ServiceStatus::from_code);
            let address = ManagementAddress {
                ip_address,
                client_name: client_display_name(client),
                client_id: client.id,
                service_id: resolve_service_id(services, client.id),
                service_status,
            };
            if address.ip_address.is_none() {
                debug!(
                    client_id = client.id,
                    name = %address.client_name,
                    "client has no resolvable IP"
                );
            }
            address
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn services() -> Vec<CrmService> {
        serde_json::from_value(json!([
            { "id": 101, "clientId": 1, "status": 1, "unmsClientSiteId": "site-1" },
            { "id": 102, "clientId": 2, "status": 1, "unmsClientSiteId": "site-2" },
            { "id": 103, "clientId": 3, "status": 3, "unmsClientSiteId": "site-3" },
            { "id": 104, "clientId": 4, "status": 1, "unmsClientSiteId": null },
            { "id": 105, "clientId": 5, "status": 1, "unmsClientSiteId": "site-5" },
            { "id": 199, "clientId": 1, "status": 2, "unmsClientSiteId": "site-9" }
        ]))
        .expect("valid services")
    }

    fn devices() -> Vec<NmsDevice> {
        serde_json::from_value(json!([
            { "id": "d0", "identification": null, "ipAddress": "10.9.9.9" },
            { "id": "d1", "identification": { "name": "Device-1", "site": { "id": "site-1" } }, "ipAddress": "192.168.1.10/24" },
            { "id": "d1b", "identification": { "name": "Device-1b", "site": { "id": "site-1" } }, "ipAddress": "192.168.1.11/24" },
            { "id": "d2", "identification": { "name": "Device-2", "site": { "id": "site-2" } }, "ipAddress": null },
            { "id": "d3", "identification": { "name": "Device-3", "site": { "id": "site-3" } }, "ipAddress": "192.168.1.30" }
        ]))
        .expect("valid devices")
    }

    fn fixed(octet: u8) -> FixedOctet {
        FixedOctet(octet)
    }

    #[test]
    fn service_lookups_take_first_match() {
        let services = services();
        assert_eq!(resolve_service_id(&services, 1), Some(101));
        assert_eq!(resolve_service_status(&services, 1), Some(1));
        assert_eq!(resolve_service_status(&services, 3), Some(3));
        assert_eq!(resolve_service_id(&services, 42), None);
        assert_eq!(resolve_service_status(&services, 42), None);
    }

    #[test]
    fn client_ip_strips_prefix_and_first_device_wins() {
        let ip = resolve_client_ip(&devices(), &services(), 1, &mut fixed(100));
        assert_eq!(ip, Some("192.168.1.10".parse().expect("valid ip")));
    }

    #[test]
    fn missing_device_ip_uses_fallback() {
        let ip = resolve_client_ip(&devices(), &services(), 2, &mut fixed(100));
        assert_eq!(ip.map(|ip| ip.to_string()).as_deref(), Some("192.0.0.100"));
    }

    #[test]
    fn fallback_octet_is_clamped() {
        let low = resolve_client_ip(&devices(), &services(), 2, &mut fixed(0));
        let high = resolve_client_ip(&devices(), &services(), 2, &mut fixed(255));
        assert_eq!(low.map(|ip| ip.to_string()).as_deref(), Some("192.0.0.2"));
        assert_eq!(high.map(|ip| ip.to_string()).as_deref(), Some("192.0.0.254"));
    }

    #[test]
    fn random_fallback_stays_in_range() {
        let mut octets = RandomOctets::new(StdRng::seed_from_u64(7));
        for _ in 0..200 {
            let IpAddr::V4(ip) = fallback_address(&mut octets) else {
                panic!("fallback must be IPv4");
            };
            let [a, b, c, d] = ip.octets();
            assert_eq!([a, b, c], FALLBACK_PREFIX);
            assert!(FALLBACK_OCTETS.contains(&d), "octet {d} out of range");
        }
    }

    #[test]
    fn unresolvable_links_yield_none() {
        let (devices, services) = (devices(), services());
        // no service
        assert_eq!(resolve_client_ip(&devices, &services, 42, &mut fixed(100)), None);
        // service without site
        assert_eq!(resolve_client_ip(&devices, &services, 4, &mut fixed(100)), None);
        // site without device
        assert_eq!(resolve_client_ip(&devices, &services, 5, &mut fixed(100)), None);
    }

    #[test]
    fn builds_one_record_per_client() {
        let clients: Vec<CrmClientRecord> = serde_json::from_value(json!([
            { "id": 1, "firstName": "John", "lastName": "Doe" },
            { "id": 3, "firstName": "Bob", "lastName": "Johnson" },
            { "id": 42, "firstName": "No", "lastName": "Service" }
        ]))
        .expect("valid clients");

        let built = build_management_addresses(&clients, &services(), &devices(), &mut fixed(100));

        assert_eq!(built.len(), 3);
        assert_eq!(built[0].comment(), "John Doe - 1_101");
        assert_eq!(built[0].service_status, Some(ServiceStatus::Active));
        assert_eq!(built[1].service_status, Some(ServiceStatus::Suspended));
        assert_eq!(
            built[1].ip_address,
            Some("192.168.1.30".parse().expect("valid ip"))
        );
        assert_eq!(
            built[2],
            ManagementAddress {
                ip_address: None,
                client_name: "No Service".into(),
                client_id: 42,
                service_id: None,
                service_status: None,
            }
        );
    }
}
