// ── Bulk mutator ──
//
// Applies one category's additions and removals against the router.
// Requests fan out over a bounded number of in-flight futures sharing the
// router client's connection pool. A failed item is logged and counted;
// it never aborts its siblings and never fails the batch.

use std::collections::HashMap;
use std::net::IpAddr;

use futures_util::StreamExt;
use futures_util::stream;
use serde::Serialize;
use tracing::{debug, info, warn};
use uisync_api::{AddressListItem, RouterOsClient};

use crate::config::DEFAULT_WORKERS;
use crate::convert::parse_host_address;
use crate::error::CoreError;
use crate::model::{AddressAddition, AddressRemoval, ListCategory, ResolvedRemoval};

// ── Entry-id index ─────────────────────────────────────────────────

fn index_key(list: &str, address: &str) -> String {
    let address =
        parse_host_address(address).map_or_else(|| address.to_owned(), |ip| ip.to_string());
    format!("{list}:{address}")
}

fn ip_key(list: &str, ip: IpAddr) -> String {
    format!("{list}:{ip}")
}

/// `"<list>:<ip>"` -> router row id, built from one bulk fetch.
#[derive(Debug, Clone, Default)]
pub struct EntryIdIndex {
    ids: HashMap<String, String>,
}

impl EntryIdIndex {
    pub fn from_items(items: &[AddressListItem]) -> Self {
        let ids = items
            .iter()
            .filter(|item| !item.id.is_empty())
            .map(|item| (index_key(&item.list, &item.address), item.id.clone()))
            .collect();
        Self { ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, category: ListCategory, ip: IpAddr) -> Option<&str> {
        self.ids
            .get(&ip_key(category.list_name(), ip))
            .map(String::as_str)
    }

    /// Resolve removals in input order. Addresses no longer on the router
    /// are dropped with a warning.
    pub fn resolve(&self, removals: &[AddressRemoval]) -> Vec<ResolvedRemoval> {
        removals
            .iter()
            .filter_map(|removal| {
                let Some(id) = self.get(removal.category, removal.ip_address) else {
                    warn!(
                        ip = %removal.ip_address,
                        list = removal.category.list_name(),
                        "address not found on router, skipping removal"
                    );
                    return None;
                };
                Some(ResolvedRemoval {
                    entry_id: id.to_owned(),
                    ip_address: removal.ip_address,
                    category: removal.category,
                })
            })
            .collect()
    }
}

// ── Batch summary ──────────────────────────────────────────────────

/// Counts from one category's batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub added: usize,
    pub add_failed: usize,
    pub removed: usize,
    pub remove_failed: usize,
    /// Removals dropped because the router no longer had the address.
    pub unresolved: usize,
}

impl BatchSummary {
    pub fn success_count(&self) -> usize {
        self.added + self.removed
    }

    pub fn error_count(&self) -> usize {
        self.add_failed + self.remove_failed
    }

    pub fn merge(&mut self, other: Self) {
        self.added += other.added;
        self.add_failed += other.add_failed;
        self.removed += other.removed;
        self.remove_failed += other.remove_failed;
        self.unresolved += other.unresolved;
    }
}

// ── Mutator ────────────────────────────────────────────────────────

/// Bounded-concurrency writer for router address lists.
#[derive(Debug, Clone)]
pub struct BulkMutator {
    router: RouterOsClient,
    workers: usize,
}

impl BulkMutator {
    /// `workers` bounds in-flight requests. Size the router client's pool
    /// to match.
    pub fn new(router: RouterOsClient, workers: usize) -> Self {
        Self {
            router,
            workers: if workers == 0 { DEFAULT_WORKERS } else { workers },
        }
    }

    /// Single-shot lookup of one removal's row id.
    pub async fn resolve_entry_id(
        &self,
        removal: &AddressRemoval,
    ) -> Result<Option<ResolvedRemoval>, CoreError> {
        let address = removal.ip_address.to_string();
        let items = self
            .router
            .find_address_list_items(removal.category.list_name(), &address)
            .await?;
        Ok(items.into_iter().next().map(|item| ResolvedRemoval {
            entry_id: item.id,
            ip_address: removal.ip_address,
            category: removal.category,
        }))
    }

    /// Fetch the whole address-list collection once and index it.
    pub async fn fetch_entry_index(&self) -> Result<EntryIdIndex, CoreError> {
        let items = self.router.get_address_list(None).await?;
        let index = EntryIdIndex::from_items(&items);
        debug!(entries = index.len(), "built entry-id index");
        Ok(index)
    }

    /// Resolve every removal against one bulk fetch.
    pub async fn resolve_entry_ids(
        &self,
        removals: &[AddressRemoval],
    ) -> Result<Vec<ResolvedRemoval>, CoreError> {
        if removals.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.fetch_entry_index().await?.resolve(removals))
    }

    /// Create every addition. Never fails as a whole.
    pub async fn add_all(&self, additions: &[AddressAddition]) -> BatchSummary {
        let mut summary = BatchSummary::default();
        if additions.is_empty() {
            return summary;
        }

        let results: Vec<bool> = stream::iter(additions)
            .map(|addition| async move {
                let address = addition.ip_address.to_string();
                let list = addition.category.list_name();
                match self
                    .router
                    .add_address_to_list(&address, list, &addition.comment)
                    .await
                {
                    Ok(_) => {
                        debug!(ip = %addition.ip_address, list, "added address");
                        true
                    }
                    Err(e) => {
                        warn!(ip = %addition.ip_address, list, error = %e, "failed to add address");
                        false
                    }
                }
            })
            .buffer_unordered(self.workers)
            .collect()
            .await;

        for ok in results {
            if ok {
                summary.added += 1;
            } else {
                summary.add_failed += 1;
            }
        }
        summary
    }

    /// Delete every resolved removal. Never fails as a whole.
    pub async fn remove_all(&self, removals: &[ResolvedRemoval]) -> BatchSummary {
        let mut summary = BatchSummary::default();
        if removals.is_empty() {
            return summary;
        }

        let results: Vec<bool> = stream::iter(removals)
            .map(|removal| async move {
                let list = removal.category.list_name();
                match self.router.remove_address_from_list(&removal.entry_id).await {
                    Ok(()) => {
                        debug!(
                            ip = %removal.ip_address,
                            list,
                            id = %removal.entry_id,
                            "removed address"
                        );
                        true
                    }
                    Err(e) => {
                        warn!(
                            ip = %removal.ip_address,
                            list,
                            error = %e,
                            "failed to remove address"
                        );
                        false
                    }
                }
            })
            .buffer_unordered(self.workers)
            .collect()
            .await;

        for ok in results {
            if ok {
                summary.removed += 1;
            } else {
                summary.remove_failed += 1;
            }
        }
        summary
    }

    /// Apply one category: resolve and remove first, then add.
    pub async fn apply(
        &self,
        category: ListCategory,
        additions: &[AddressAddition],
        removals: &[AddressRemoval],
        index: &EntryIdIndex,
    ) -> BatchSummary {
        let resolved = index.resolve(removals);
        let mut summary = BatchSummary {
            unresolved: removals.len() - resolved.len(),
            ..BatchSummary::default()
        };

        summary.merge(self.remove_all(&resolved).await);
        summary.merge(self.add_all(additions).await);

        info!(
            list = category.list_name(),
            added = summary.added,
            removed = summary.removed,
            failed = summary.error_count(),
            unresolved = summary.unresolved,
            "list synchronized"
        );
        summary
    }

    /// Like [`apply`](Self::apply) but fetches its own entry-id index.
    /// If that fetch fails every removal is counted as failed; additions
    /// still go ahead.
    pub async fn sync_list(
        &self,
        category: ListCategory,
        additions: &[AddressAddition],
        removals: &[AddressRemoval],
    ) -> BatchSummary {
        if removals.is_empty() {
            return self.apply(category, additions, removals, &EntryIdIndex::default()).await;
        }
        match self.fetch_entry_index().await {
            Ok(index) => self.apply(category, additions, removals, &index).await,
            Err(e) => {
                warn!(list = category.list_name(), error = %e, "could not resolve entry ids");
                let mut summary = BatchSummary {
                    remove_failed: removals.len(),
                    ..BatchSummary::default()
                };
                summary.merge(self.add_all(additions).await);
                summary
            }
        }
    }
}
