// ── Sync orchestrator ──
//
// One cycle: load UISP -> load router -> per category (suspended, active,
// all) reconcile, remove, add. Fetch failures abort the cycle; per-item
// mutation failures do not. Nothing is carried between cycles.
//
// Callers must not run two cycles against the same router at once; the
// `uisync run` loop is sequential so this holds there.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uisync_api::{AddressListItem, CrmClient, HealthcheckClient, NmsClient, RouterOsClient};

use crate::config::SyncConfig;
use crate::error::CoreError;
use crate::lookup::{RandomOctets, build_management_addresses};
use crate::model::{ListCategory, ManagementAddress, RouterAddressEntry};
use crate::mutate::{BatchSummary, BulkMutator, EntryIdIndex};
use crate::reconcile::{Reconciliation, reconcile};

// ── Router snapshot ────────────────────────────────────────────────

/// Every syncer-owned router entry, read in one request.
#[derive(Debug, Clone, Default)]
pub struct RouterSnapshot {
    pub entries: Vec<RouterAddressEntry>,
    pub index: EntryIdIndex,
}

impl RouterSnapshot {
    pub fn from_items(items: &[AddressListItem]) -> Self {
        let entries = items
            .iter()
            .filter_map(|item| match RouterAddressEntry::try_from(item) {
                Ok(entry) => Some(entry),
                Err(reason) => {
                    debug!(
                        list = %item.list,
                        address = %item.address,
                        ?reason,
                        "ignoring router entry"
                    );
                    None
                }
            })
            .collect();
        Self {
            entries,
            index: EntryIdIndex::from_items(items),
        }
    }
}

// ── Plan / report ──────────────────────────────────────────────────

/// Reconciliation of all three categories, in processing order.
#[derive(Debug, Clone, Serialize)]
pub struct SyncPlan {
    pub management_count: usize,
    pub unresolved_count: usize,
    pub router_count: usize,
    pub categories: Vec<Reconciliation>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(Reconciliation::is_empty)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub category: ListCategory,
    pub planned_additions: usize,
    pub planned_removals: usize,
    pub summary: BatchSummary,
}

/// Outcome of one applied cycle.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub categories: Vec<CategoryReport>,
}

impl SyncReport {
    pub fn elapsed(&self) -> std::time::Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }

    pub fn totals(&self) -> BatchSummary {
        let mut total = BatchSummary::default();
        for report in &self.categories {
            total.merge(report.summary);
        }
        total
    }
}

// ── Syncer ─────────────────────────────────────────────────────────

/// Owns the API clients for one UISP / router pair.
pub struct Syncer {
    nms: NmsClient,
    crm: CrmClient,
    router: RouterOsClient,
    mutator: BulkMutator,
    healthcheck: Option<HealthcheckClient>,
}

impl Syncer {
    pub fn new(config: &SyncConfig) -> Result<Self, CoreError> {
        let uisp_transport = config.transport(&config.uisp.tls);
        let router_transport = config.transport(&config.router.tls);

        let uisp_url = config.uisp.url.as_str();
        let nms = NmsClient::new(uisp_url, &config.uisp.nms_token, &uisp_transport)?;
        let crm = CrmClient::new(uisp_url, &config.uisp.crm_token, &uisp_transport)?;
        let router = RouterOsClient::new(
            config.router.url.as_str(),
            &config.router.username,
            config.router.password.clone(),
            &router_transport,
        )?;
        let healthcheck = config
            .healthcheck_url
            .as_ref()
            .map(|url| HealthcheckClient::new(url.as_str(), &config.healthcheck_transport()))
            .transpose()?;

        Ok(Self::from_clients(nms, crm, router, config.workers).with_healthcheck(healthcheck))
    }

    /// Assemble from pre-built clients (tests, custom transports).
    pub fn from_clients(
        nms: NmsClient,
        crm: CrmClient,
        router: RouterOsClient,
        workers: usize,
    ) -> Self {
        let mutator = BulkMutator::new(router.clone(), workers);
        Self {
            nms,
            crm,
            router,
            mutator,
            healthcheck: None,
        }
    }

    #[must_use]
    pub fn with_healthcheck(mut self, healthcheck: Option<HealthcheckClient>) -> Self {
        self.healthcheck = healthcheck;
        self
    }

    pub fn router(&self) -> &RouterOsClient {
        &self.router
    }

    /// Fetch clients, services, and devices concurrently and join them.
    pub async fn load_management_addresses(&self) -> Result<Vec<ManagementAddress>, CoreError> {
        let (clients, services, devices) = tokio::join!(
            self.crm.get_clients(),
            self.crm.get_services(),
            self.nms.get_devices(),
        );
        let (clients, services, devices) = (clients?, services?, devices?);
        debug!(
            clients = clients.len(),
            services = services.len(),
            devices = devices.len(),
            "loaded UISP collections"
        );

        let mut octets = RandomOctets::from_entropy();
        Ok(build_management_addresses(&clients, &services, &devices, &mut octets))
    }

    /// Fetch every address list in one request.
    pub async fn load_router_addresses(&self) -> Result<RouterSnapshot, CoreError> {
        let items = self.router.get_address_list(None).await?;
        let snapshot = RouterSnapshot::from_items(&items);
        debug!(rows = items.len(), owned = snapshot.entries.len(), "loaded router address lists");
        Ok(snapshot)
    }

    fn reconcile_all(management: &[ManagementAddress], snapshot: &RouterSnapshot) -> SyncPlan {
        let categories = ListCategory::SYNC_ORDER
            .into_iter()
            .map(|category| reconcile(category, management, &snapshot.entries))
            .collect();
        SyncPlan {
            management_count: management.len(),
            unresolved_count: management.iter().filter(|a| a.ip_address.is_none()).count(),
            router_count: snapshot.entries.len(),
            categories,
        }
    }

    async fn load(&self) -> Result<(SyncPlan, RouterSnapshot), CoreError> {
        let management = self.load_management_addresses().await?;
        let snapshot = self.load_router_addresses().await?;
        Ok((Self::reconcile_all(&management, &snapshot), snapshot))
    }

    /// Load both sides and reconcile without touching the router.
    pub async fn plan(&self) -> Result<SyncPlan, CoreError> {
        Ok(self.load().await?.0)
    }

    /// Run one full cycle.
    pub async fn run_cycle(&self) -> Result<SyncReport, CoreError> {
        let started_at = Utc::now();
        let (plan, snapshot) = self.load().await?;

        let mut categories = Vec::with_capacity(plan.categories.len());
        for reconciliation in &plan.categories {
            let category = reconciliation.category;
            let additions = reconciliation.additions();
            let removals = reconciliation.removals();
            info!(
                list = category.list_name(),
                to_add = additions.len(),
                to_remove = removals.len(),
                "reconciled"
            );

            let summary = self
                .mutator
                .apply(category, &additions, &removals, &snapshot.index)
                .await;
            categories.push(CategoryReport {
                category,
                planned_additions: additions.len(),
                planned_removals: removals.len(),
                summary,
            });
        }

        let report = SyncReport {
            started_at,
            finished_at: Utc::now(),
            categories,
        };
        info!(
            failed = report.totals().error_count(),
            "all addresses should now be synchronized"
        );

        if let Some(healthcheck) = &self.healthcheck {
            if let Err(e) = healthcheck.ping().await {
                warn!(url = %healthcheck.url(), error = %e, "healthcheck ping failed");
            }
        }
        Ok(report)
    }
}
