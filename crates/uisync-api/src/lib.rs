// uisync-api: Async Rust clients for UISP (NMS + CRM) and MikroTik RouterOS REST

pub mod error;
pub mod healthcheck;
pub mod routeros;
pub mod transport;
pub mod uisp;

pub use error::Error;
pub use healthcheck::HealthcheckClient;
pub use routeros::RouterOsClient;
pub use routeros::models::AddressListItem;
pub use transport::{TlsMode, TransportConfig};
pub use uisp::models::{CrmClientRecord, CrmService, NmsDevice};
pub use uisp::{CrmClient, NmsClient};
