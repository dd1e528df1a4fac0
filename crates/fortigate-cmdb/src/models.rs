//! Request models and their validation.
//!
//! Every constructor takes the raw JSON mapping a tool received and checks
//! presence of required fields and allowed discriminator values before
//! anything is sent to the device. Fields the model does not know about are
//! kept and forwarded untouched, so any FortiOS attribute can be set.

use fortigate_core::ids::PolicyId;
use fortigate_core::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::tables::CmdbTable;
use crate::Result;

/// Raw JSON mapping as received from a tool invocation.
pub type Fields = Map<String, Value>;

/// Policy fields that hold lists of `{"name": ...}` references.
pub const POLICY_NAMED_LIST_FIELDS: [&str; 5] =
    ["srcintf", "dstintf", "srcaddr", "dstaddr", "service"];

/// Fields a new policy must carry.
pub const POLICY_REQUIRED_FIELDS: [&str; 9] = [
    "name", "srcintf", "dstintf", "srcaddr", "dstaddr", "action", "schedule", "service", "status",
];

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident, $label:expr, { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Value as FortiOS spells it.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            /// Every accepted value.
            #[must_use]
            pub const fn allowed() -> &'static [&'static str] {
                &[$($text),+]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let wanted = s.trim();
                $(
                    if wanted.eq_ignore_ascii_case($text) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(Error::InvalidInput(format!(
                    "unrecognized {} '{}', expected one of: {}",
                    $label,
                    wanted,
                    Self::allowed().join(", ")
                )))
            }
        }
    };
}

choice_enum!(
    /// Where a moved policy lands relative to the reference policy.
    MovePosition, "position", {
        /// Place before the reference
        Before => "before",
        /// Place after the reference
        After => "after",
    }
);

choice_enum!(
    /// Policy verdict.
    PolicyAction, "policy action", {
        /// Allow matching traffic
        Accept => "accept",
        /// Drop matching traffic
        Deny => "deny",
        /// Send matching traffic through an IPsec tunnel
        Ipsec => "ipsec",
    }
);

choice_enum!(
    /// Administrative state.
    Status, "status", {
        /// Active
        Enable => "enable",
        /// Inactive
        Disable => "disable",
    }
);

choice_enum!(
    /// Interface type.
    InterfaceType, "interface type", {
        /// Physical port
        Physical => "physical",
        /// 802.1Q sub-interface
        Vlan => "vlan",
        /// Loopback
        Loopback => "loopback",
        /// 802.3ad aggregate
        Aggregate => "aggregate",
        /// Redundant pair
        Redundant => "redundant",
        /// Tunnel
        Tunnel => "tunnel",
        /// Inter-VDOM link
        VdomLink => "vdom-link",
    }
);

choice_enum!(
    /// Address object subtype discriminator (`type`).
    AddressType, "address type", {
        /// Subnet (`subnet`)
        IpMask => "ipmask",
        /// Address range (`start-ip`, `end-ip`)
        IpRange => "iprange",
        /// Domain name (`fqdn`)
        Fqdn => "fqdn",
    }
);

choice_enum!(
    /// Service object subtype discriminator (`protocol`).
    ServiceProtocol, "service protocol", {
        /// Port ranges (`tcp-portrange`, `udp-portrange`, `sctp-portrange`)
        TcpUdpSctp => "TCP/UDP/SCTP",
        /// ICMP type/code
        Icmp => "ICMP",
        /// ICMPv6 type/code
        Icmp6 => "ICMP6",
        /// Raw IP protocol number (`protocol-number`)
        Ip => "IP",
    }
);

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidInput(message.into())
}

/// Fetch a required, non-empty string field.
fn require_str(fields: &Fields, key: &str, context: &str) -> Result<String> {
    match fields.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(invalid(format!(
            "field '{key}' must not be empty in {context}"
        ))),
        Some(_) => Err(invalid(format!("field '{key}' must be a string in {context}"))),
        None => Err(invalid(format!("missing required field '{key}' in {context}"))),
    }
}

/// Fetch an optional string field; present but non-string values are rejected.
fn optional_str(fields: &Fields, key: &str, context: &str) -> Result<Option<String>> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(format!("field '{key}' must be a string in {context}"))),
    }
}

/// Fetch an integer field within `range`, accepting numeric strings.
fn integer_in(
    fields: &Fields,
    key: &str,
    range: std::ops::RangeInclusive<u64>,
    context: &str,
) -> Result<Option<u64>> {
    let value = match fields.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(_) => None,
    };
    match value {
        Some(v) if range.contains(&v) => Ok(Some(v)),
        _ => Err(invalid(format!(
            "field '{key}' must be an integer between {} and {} in {context}",
            range.start(),
            range.end()
        ))),
    }
}

fn require_integer_in(
    fields: &Fields,
    key: &str,
    range: std::ops::RangeInclusive<u64>,
    context: &str,
) -> Result<u64> {
    integer_in(fields, key, range, context)?
        .ok_or_else(|| invalid(format!("missing required field '{key}' in {context}")))
}

/// Fetch a list of `{"name": ...}` references and return the names.
fn named_list(fields: &Fields, key: &str, context: &str) -> Result<Vec<String>> {
    let items = match fields.get(key) {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(invalid(format!(
                "field '{key}' must be a list like [{{\"name\": \"value\"}}] in {context}"
            )))
        }
        None => return Err(invalid(format!("missing required field '{key}' in {context}"))),
    };

    items
        .iter()
        .map(|item| match item.get("name") {
            Some(Value::String(name)) if !name.trim().is_empty() => Ok(name.clone()),
            _ => Err(invalid(format!(
                "items in '{key}' must be objects with a non-empty 'name' in {context}"
            ))),
        })
        .collect()
}

fn parse_choice<T: FromStr<Err = Error>>(fields: &Fields, key: &str, context: &str) -> Result<T> {
    require_str(fields, key, context)?.parse::<T>()
}

/// A new firewall policy.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyConfig {
    name: String,
    action: PolicyAction,
    status: Status,
    fields: Fields,
}

impl PolicyConfig {
    /// Policy name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Policy verdict.
    #[must_use]
    pub const fn action(&self) -> PolicyAction {
        self.action
    }

    /// Administrative state.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// JSON body for the device.
    #[must_use]
    pub fn into_payload(self) -> Value {
        Value::Object(self.fields)
    }
}

impl TryFrom<Fields> for PolicyConfig {
    type Error = Error;

    fn try_from(mut fields: Fields) -> Result<Self> {
        let label = fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("UnnamedPolicy")
            .to_string();
        let context = format!("policy configuration for '{label}'");

        for key in POLICY_REQUIRED_FIELDS {
            if !fields.contains_key(key) {
                return Err(invalid(format!("missing required field '{key}' in {context}")));
            }
        }
        for key in POLICY_NAMED_LIST_FIELDS {
            named_list(&fields, key, &context)?;
        }
        let name = require_str(&fields, "name", &context)?;
        require_str(&fields, "schedule", &context)?;
        let action: PolicyAction = parse_choice(&fields, "action", &context)?;
        let status: Status = parse_choice(&fields, "status", &context)?;

        fields.insert("action".into(), Value::String(action.as_str().into()));
        fields.insert("status".into(), Value::String(status.as_str().into()));

        Ok(Self {
            name,
            action,
            status,
            fields,
        })
    }
}

/// A partial update of an existing policy.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyUpdate {
    fields: Fields,
}

impl PolicyUpdate {
    /// Validate an update for `policy_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty update, a mismatching
    /// `policyid`, or malformed fields.
    pub fn new(policy_id: PolicyId, mut fields: Fields) -> Result<Self> {
        let context = format!("update for policy {policy_id}");
        if fields.is_empty() {
            return Err(invalid(format!("{context} contains no fields")));
        }
        let key = CmdbTable::FirewallPolicy.mkey_field();
        if let Some(id) = integer_in(&fields, key, 0..=u64::from(u32::MAX), &context)? {
            if id != u64::from(policy_id.get()) {
                return Err(invalid(format!(
                    "'{key}' {id} in body does not match the policy being updated ({policy_id})"
                )));
            }
        }
        for key in POLICY_NAMED_LIST_FIELDS {
            if fields.contains_key(key) {
                named_list(&fields, key, &context)?;
            }
        }
        if fields.contains_key("action") {
            let action: PolicyAction = parse_choice(&fields, "action", &context)?;
            fields.insert("action".into(), Value::String(action.as_str().into()));
        }
        if fields.contains_key("status") {
            let status: Status = parse_choice(&fields, "status", &context)?;
            fields.insert("status".into(), Value::String(status.as_str().into()));
        }
        Ok(Self { fields })
    }

    /// JSON body for the device.
    #[must_use]
    pub fn into_payload(self) -> Value {
        Value::Object(self.fields)
    }
}

/// A new network interface.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceConfig {
    name: String,
    kind: InterfaceType,
    parent: Option<String>,
    fields: Fields,
}

impl InterfaceConfig {
    /// Interface name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Interface type.
    #[must_use]
    pub const fn kind(&self) -> InterfaceType {
        self.kind
    }

    /// Parent interface of a VLAN.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// JSON body for the device.
    #[must_use]
    pub fn into_payload(self) -> Value {
        Value::Object(self.fields)
    }
}

impl TryFrom<Fields> for InterfaceConfig {
    type Error = Error;

    fn try_from(mut fields: Fields) -> Result<Self> {
        let name = require_str(&fields, "name", "interface configuration")?;
        let context = format!("interface configuration for '{name}'");
        let kind: InterfaceType = parse_choice(&fields, "type", &context)?;

        let parent = match kind {
            InterfaceType::Vlan => {
                require_integer_in(&fields, "vlanid", 1..=4094, &context)?;
                require_str(&fields, "ip", &context)?;
                Some(require_str(&fields, "interface", &context)?)
            }
            InterfaceType::Loopback => {
                require_str(&fields, "ip", &context)?;
                None
            }
            _ => optional_str(&fields, "interface", &context)?,
        };
        fields.insert("type".into(), Value::String(kind.as_str().into()));

        Ok(Self {
            name,
            kind,
            parent,
            fields,
        })
    }
}

/// A new static route.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticRouteConfig {
    dst: String,
    gateway: String,
    device: String,
    fields: Fields,
}

impl StaticRouteConfig {
    /// Destination prefix.
    #[must_use]
    pub fn dst(&self) -> &str {
        &self.dst
    }

    /// Next hop.
    #[must_use]
    pub fn gateway(&self) -> &str {
        &self.gateway
    }

    /// Egress interface.
    #[must_use]
    pub fn device(&self) -> &str {
        &self.device
    }

    /// JSON body for the device.
    #[must_use]
    pub fn into_payload(self) -> Value {
        Value::Object(self.fields)
    }
}

impl TryFrom<Fields> for StaticRouteConfig {
    type Error = Error;

    fn try_from(mut fields: Fields) -> Result<Self> {
        let context = "static route configuration";
        let dst = require_str(&fields, "dst", context)?;
        let gateway = require_str(&fields, "gateway", context)?;
        let device = require_str(&fields, "device", context)?;
        integer_in(&fields, "distance", 1..=255, context)?;

        let status = match optional_str(&fields, "status", context)? {
            Some(status) => status.parse::<Status>()?,
            None => Status::Enable,
        };
        fields.insert("status".into(), Value::String(status.as_str().into()));

        Ok(Self {
            dst,
            gateway,
            device,
            fields,
        })
    }
}

/// Subtype-specific data of an address object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressKind {
    /// Subnet, `"10.0.0.0 255.255.255.0"` or CIDR
    IpMask {
        /// Subnet expression
        subnet: String,
    },
    /// Inclusive address range
    IpRange {
        /// First address
        start_ip: String,
        /// Last address
        end_ip: String,
    },
    /// Domain name
    Fqdn {
        /// Fully-qualified domain name
        fqdn: String,
    },
}

impl AddressKind {
    /// Discriminator value.
    #[must_use]
    pub const fn address_type(&self) -> AddressType {
        match self {
            Self::IpMask { .. } => AddressType::IpMask,
            Self::IpRange { .. } => AddressType::IpRange,
            Self::Fqdn { .. } => AddressType::Fqdn,
        }
    }
}

/// A new address object.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressObject {
    name: String,
    kind: AddressKind,
    fields: Fields,
}

impl AddressObject {
    /// Object name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Subtype data.
    #[must_use]
    pub const fn kind(&self) -> &AddressKind {
        &self.kind
    }

    /// JSON body for the device.
    #[must_use]
    pub fn into_payload(self) -> Value {
        Value::Object(self.fields)
    }
}

impl TryFrom<Fields> for AddressObject {
    type Error = Error;

    fn try_from(mut fields: Fields) -> Result<Self> {
        let name = require_str(&fields, "name", "address object configuration")?;
        let context = format!("address object '{name}'");
        let address_type: AddressType = parse_choice(&fields, "type", &context)?;

        let kind = match address_type {
            AddressType::IpMask => AddressKind::IpMask {
                subnet: require_str(&fields, "subnet", &context)?,
            },
            AddressType::IpRange => AddressKind::IpRange {
                start_ip: require_str(&fields, "start-ip", &context)?,
                end_ip: require_str(&fields, "end-ip", &context)?,
            },
            AddressType::Fqdn => AddressKind::Fqdn {
                fqdn: require_str(&fields, "fqdn", &context)?,
            },
        };
        fields.insert("type".into(), Value::String(address_type.as_str().into()));

        Ok(Self { name, kind, fields })
    }
}

/// Subtype-specific data of a service object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceKind {
    /// One or more port ranges
    PortRanges {
        /// `tcp-portrange`
        tcp: Option<String>,
        /// `udp-portrange`
        udp: Option<String>,
        /// `sctp-portrange`
        sctp: Option<String>,
    },
    /// ICMP or ICMPv6 match
    Icmp {
        /// ICMPv6 rather than ICMP
        v6: bool,
        /// ICMP type, any when absent
        icmp_type: Option<u8>,
        /// ICMP code, any when absent
        icmp_code: Option<u8>,
    },
    /// Raw IP protocol
    IpProtocol {
        /// IP protocol number
        number: u8,
    },
}

impl ServiceKind {
    /// Discriminator value.
    #[must_use]
    pub const fn protocol(&self) -> ServiceProtocol {
        match self {
            Self::PortRanges { .. } => ServiceProtocol::TcpUdpSctp,
            Self::Icmp { v6: false, .. } => ServiceProtocol::Icmp,
            Self::Icmp { v6: true, .. } => ServiceProtocol::Icmp6,
            Self::IpProtocol { .. } => ServiceProtocol::Ip,
        }
    }
}

/// A new custom service object.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceObject {
    name: String,
    kind: ServiceKind,
    fields: Fields,
}

impl ServiceObject {
    /// Object name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Subtype data.
    #[must_use]
    pub const fn kind(&self) -> &ServiceKind {
        &self.kind
    }

    /// JSON body for the device.
    #[must_use]
    pub fn into_payload(self) -> Value {
        Value::Object(self.fields)
    }
}

fn to_u8(value: Option<u64>) -> Option<u8> {
    value.and_then(|v| u8::try_from(v).ok())
}

impl TryFrom<Fields> for ServiceObject {
    type Error = Error;

    fn try_from(mut fields: Fields) -> Result<Self> {
        let name = require_str(&fields, "name", "service object configuration")?;
        let context = format!("service object '{name}'");
        let protocol: ServiceProtocol = parse_choice(&fields, "protocol", &context)?;

        let kind = match protocol {
            ServiceProtocol::TcpUdpSctp => {
                let tcp = optional_str(&fields, "tcp-portrange", &context)?;
                let udp = optional_str(&fields, "udp-portrange", &context)?;
                let sctp = optional_str(&fields, "sctp-portrange", &context)?;
                if tcp.is_none() && udp.is_none() && sctp.is_none() {
                    return Err(invalid(format!(
                        "protocol TCP/UDP/SCTP needs at least one of 'tcp-portrange', \
                         'udp-portrange' or 'sctp-portrange' for {context}"
                    )));
                }
                ServiceKind::PortRanges { tcp, udp, sctp }
            }
            ServiceProtocol::Icmp | ServiceProtocol::Icmp6 => ServiceKind::Icmp {
                v6: protocol == ServiceProtocol::Icmp6,
                icmp_type: to_u8(integer_in(&fields, "icmptype", 0..=255, &context)?),
                icmp_code: to_u8(integer_in(&fields, "icmpcode", 0..=255, &context)?),
            },
            ServiceProtocol::Ip => ServiceKind::IpProtocol {
                number: to_u8(Some(require_integer_in(
                    &fields,
                    "protocol-number",
                    0..=255,
                    &context,
                )?))
                .unwrap_or_default(),
            },
        };
        fields.insert("protocol".into(), Value::String(protocol.as_str().into()));

        Ok(Self { name, kind, fields })
    }
}

/// A new service group.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceGroup {
    name: String,
    members: Vec<String>,
    fields: Fields,
}

impl ServiceGroup {
    /// Group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member service names, in order.
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// JSON body for the device.
    #[must_use]
    pub fn into_payload(self) -> Value {
        Value::Object(self.fields)
    }
}

impl TryFrom<Fields> for ServiceGroup {
    type Error = Error;

    fn try_from(fields: Fields) -> Result<Self> {
        let name = require_str(&fields, "name", "service group configuration")?;
        let context = format!("service group '{name}'");
        let members = named_list(&fields, "member", &context)?;
        if members.is_empty() {
            return Err(invalid(format!("'member' must not be empty for {context}")));
        }
        Ok(Self {
            name,
            members,
            fields,
        })
    }
}
