//! `uisync lists`: dump the router's address-list rows.

use tabled::Tabled;

use uisync_core::{AddressListItem, Syncer};

use crate::cli::{GlobalOpts, ListsArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "List")]
    list: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Comment")]
    comment: String,
    #[tabled(rename = "Disabled")]
    disabled: String,
}

fn entry_row(item: &AddressListItem) -> EntryRow {
    EntryRow {
        id: item.id.clone(),
        list: item.list.clone(),
        address: item.address.clone(),
        comment: item.comment.clone(),
        disabled: item.disabled.clone().unwrap_or_else(|| "false".into()),
    }
}

pub async fn handle(
    syncer: &Syncer,
    args: &ListsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let items = syncer
        .router()
        .get_address_list(args.list.as_deref())
        .await
        .map_err(uisync_core::CoreError::from)?;
    let out = output::render_list(global.output, &items, entry_row)?;
    output::print_output(&out);
    Ok(())
}
