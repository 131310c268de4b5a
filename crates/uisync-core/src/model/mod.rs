// ── Domain model ──
//
// Canonical types shared by lookup, reconciliation, and mutation. Raw
// UISP and RouterOS payloads are converted into these in `convert`.

pub mod address;
pub mod category;
pub mod status;

pub use address::{
    AddressAddition, AddressRemoval, Addressed, ManagementAddress, ResolvedRemoval,
    RouterAddressEntry,
};
pub use category::ListCategory;
pub use status::ServiceStatus;
