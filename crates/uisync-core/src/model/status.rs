// ── CRM service status ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Lifecycle state of a CRM service, decoded from its numeric code.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ServiceStatus {
    Prepared,
    Active,
    Ended,
    Suspended,
    PreparedBlocked,
    Obsolete,
    Deferred,
    Quoted,
    Inactive,
}

impl ServiceStatus {
    /// Decode a CRM status code. Codes outside 0..=8 yield `None`.
    pub const fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Self::Prepared,
            1 => Self::Active,
            2 => Self::Ended,
            3 => Self::Suspended,
            4 => Self::PreparedBlocked,
            5 => Self::Obsolete,
            6 => Self::Deferred,
            7 => Self::Quoted,
            8 => Self::Inactive,
            _ => return None,
        })
    }

    pub const fn code(self) -> u8 {
        match self {
            Self::Prepared => 0,
            Self::Active => 1,
            Self::Ended => 2,
            Self::Suspended => 3,
            Self::PreparedBlocked => 4,
            Self::Obsolete => 5,
            Self::Deferred => 6,
            Self::Quoted => 7,
            Self::Inactive => 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn codes_map_both_ways() {
        for status in ServiceStatus::iter() {
            assert_eq!(ServiceStatus::from_code(i64::from(status.code())), Some(status));
        }
        assert_eq!(ServiceStatus::from_code(1), Some(ServiceStatus::Active));
        assert_eq!(ServiceStatus::from_code(3), Some(ServiceStatus::Suspended));
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(ServiceStatus::from_code(9), None);
        assert_eq!(ServiceStatus::from_code(-1), None);
    }

    #[test]
    fn display_is_snake_case() {
        assert_eq!(ServiceStatus::PreparedBlocked.to_string(), "prepared_blocked");
        assert_eq!(
            "suspended".parse::<ServiceStatus>().expect("known status"),
            ServiceStatus::Suspended
        );
    }
}
