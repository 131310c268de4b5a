// RouterOS REST response types
//
// RouterOS v7 returns every property as a string, including booleans
// (`"true"`/`"false"`) and numbers. Only `.id`, `list` and `address` are
// guaranteed on an address-list row.

use serde::{Deserialize, Deserializer, Serialize};

/// One row of `/ip/firewall/address-list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressListItem {
    /// Router-assigned row identifier (e.g. `*1A`), required for deletion.
    #[serde(rename = ".id")]
    pub id: String,
    pub list: String,
    pub address: String,
    /// Missing on rows created without a comment; `null` is treated the same.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comment: String,
    #[serde(default)]
    pub disabled: Option<String>,
    #[serde(default)]
    pub dynamic: Option<String>,
}

/// Body for `PUT /ip/firewall/address-list`.
#[derive(Debug, Clone, Serialize)]
pub struct NewAddressListItem<'a> {
    pub list: &'a str,
    pub address: &'a str,
    pub comment: &'a str,
}

/// RouterOS error body: `{"error":400,"message":"Bad Request","detail":"..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct RouterOsErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_defaults_when_missing_or_null() {
        let rows: Vec<AddressListItem> = serde_json::from_str(
            r#"[
                {".id":"*1","list":"clients_active","address":"10.0.0.1"},
                {".id":"*2","list":"clients_active","address":"10.0.0.2","comment":null},
                {".id":"*3","list":"clients_active","address":"10.0.0.3","comment":"Jane"}
            ]"#,
        )
        .expect("address-list rows");

        assert_eq!(rows[0].comment, "");
        assert_eq!(rows[1].comment, "");
        assert_eq!(rows[2].comment, "Jane");
    }
}
