//! `uisync plan`: reconcile both sides and print the pending changes.

use tabled::Tabled;

use uisync_core::{SyncPlan, Syncer};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "List")]
    list: &'static str,
    #[tabled(rename = "Action")]
    action: &'static str,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

fn change_rows(plan: &SyncPlan) -> Vec<ChangeRow> {
    let mut rows = Vec::new();
    for reconciliation in &plan.categories {
        let list = reconciliation.category.list_name();
        for entry in &reconciliation.missing_from_management {
            rows.push(ChangeRow {
                list,
                action: "remove",
                address: entry.ip_address.to_string(),
                comment: entry.comment.clone(),
            });
        }
        for addition in reconciliation.additions() {
            rows.push(ChangeRow {
                list,
                action: "add",
                address: addition.ip_address.to_string(),
                comment: addition.comment,
            });
        }
    }
    rows
}

fn plan_detail(plan: &SyncPlan) -> String {
    let header = format!(
        "{} UISP clients ({} without an address), {} router entries",
        plan.management_count, plan.unresolved_count, plan.router_count
    );
    if plan.is_empty() {
        return format!("{header}\nNothing to change.");
    }
    format!("{header}\n{}", output::render_table(&change_rows(plan)))
}

pub async fn handle(syncer: &Syncer, global: &GlobalOpts) -> Result<(), CliError> {
    let plan = syncer.plan().await?;
    let out = output::render_single(global.output, &plan, plan_detail)?;
    output::print_output(&out);
    Ok(())
}
