//! Reconciliation engine between UISP and MikroTik firewall address lists.
//!
//! Each cycle turns the UISP view of every customer (client, service,
//! device) into a flat set of [`ManagementAddress`]es, reads the router's
//! `clients_active` / `clients_suspended` / `clients_all` lists, and
//! converges the router onto UISP:
//!
//! - **[`lookup`]** joins the raw UISP collections into addresses.
//! - **[`reconcile`]** computes per-category set differences keyed on IP.
//! - **[`BulkMutator`]** applies removals then additions with bounded
//!   concurrency, tolerating per-item failure.
//! - **[`Syncer`]** sequences the above and reports what happened.

pub mod config;
pub mod convert;
pub mod error;
pub mod lookup;
pub mod model;
pub mod mutate;
pub mod reconcile;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{RouterConfig, SyncConfig, TlsVerification, UispConfig};
pub use error::CoreError;
pub use model::{
    AddressAddition, AddressRemoval, ListCategory, ManagementAddress, ResolvedRemoval,
    RouterAddressEntry, ServiceStatus,
};
pub use mutate::{BatchSummary, BulkMutator, EntryIdIndex};
pub use reconcile::{Reconciliation, reconcile};
pub use sync::{CategoryReport, RouterSnapshot, SyncPlan, SyncReport, Syncer};

// ── Transport re-exports for consumers ──────────────────────────────
pub use uisync_api::{AddressListItem, RouterOsClient};
