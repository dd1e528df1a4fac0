//! CMDB tables the adapter is bound to.
//!
//! Each variant is one FortiOS configuration table. The mapping to its REST
//! path is fixed here at compile time and checked against the device once at
//! startup (see [`crate::CmdbClient::verify_surface`]).

use std::fmt;

/// A FortiOS CMDB table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmdbTable {
    /// `firewall/policy`, keyed by `policyid`
    FirewallPolicy,
    /// `system/interface`, keyed by `name`
    SystemInterface,
    /// `router/static`, keyed by `seq-num`
    RouterStatic,
    /// `firewall/address`, keyed by `name`
    FirewallAddress,
    /// `firewall.service/custom`, keyed by `name`
    FirewallServiceCustom,
    /// `firewall.service/group`, keyed by `name`
    FirewallServiceGroup,
}

impl CmdbTable {
    /// REST path below `/api/v2/cmdb/`.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::FirewallPolicy => "firewall/policy",
            Self::SystemInterface => "system/interface",
            Self::RouterStatic => "router/static",
            Self::FirewallAddress => "firewall/address",
            Self::FirewallServiceCustom => "firewall.service/custom",
            Self::FirewallServiceGroup => "firewall.service/group",
        }
    }

    /// Name of the primary key field.
    #[must_use]
    pub const fn mkey_field(&self) -> &'static str {
        match self {
            Self::FirewallPolicy => "policyid",
            Self::RouterStatic => "seq-num",
            Self::SystemInterface
            | Self::FirewallAddress
            | Self::FirewallServiceCustom
            | Self::FirewallServiceGroup => "name",
        }
    }

    /// Human-readable label used in log lines and messages.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::FirewallPolicy => "firewall policy",
            Self::SystemInterface => "interface",
            Self::RouterStatic => "static route",
            Self::FirewallAddress => "address object",
            Self::FirewallServiceCustom => "service object",
            Self::FirewallServiceGroup => "service group",
        }
    }

    /// Every bound table.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::FirewallPolicy,
            Self::SystemInterface,
            Self::RouterStatic,
            Self::FirewallAddress,
            Self::FirewallServiceCustom,
            Self::FirewallServiceGroup,
        ]
    }
}

impl fmt::Display for CmdbTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
