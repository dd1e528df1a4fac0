//! Network interface tools.

use fortigate_cmdb::{CmdbApi, CmdbTable, InterfaceConfig};
use fortigate_core::Result;
use rmcp::schemars;
use serde_json::Value;
use tracing::{debug, info};

use super::{created, creation_error, get_or_list, name_key, name_param, object_param};

const TABLE: CmdbTable = CmdbTable::SystemInterface;

/// Parameters for `get_interfaces`.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInterfacesParams {
    /// Interface name; all interfaces are returned when omitted.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub interface_name: Value,
}

/// Parameters for `create_interface`.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateInterfaceParams {
    /// Interface fields. Required: name, type (physical|vlan|loopback|
    /// aggregate|redundant|tunnel|vdom-link). VLANs also need vlanid,
    /// interface (parent) and ip; loopbacks need ip.
    #[serde(default)]
    pub interface_config: Value,
}

/// One interface by name, or all of them.
pub async fn get_interfaces(api: &dyn CmdbApi, params: GetInterfacesParams) -> Result<Value> {
    let name = name_param(&params.interface_name, "interface_name")?;
    get_or_list(
        api,
        TABLE,
        name.as_deref(),
        "interface",
        "interfaces",
    )
    .await
}

/// Create an interface.
pub async fn create_interface(api: &dyn CmdbApi, params: CreateInterfaceParams) -> Result<Value> {
    let config =
        InterfaceConfig::try_from(object_param(params.interface_config, "interface_config")?)?;
    let name = config.name().to_string();
    debug!(interface = %name, kind = %config.kind(), parent = config.parent(), "creating interface");

    let envelope = api
        .create(TABLE, config.into_payload())
        .await
        .map_err(|e| creation_error(e, TABLE, &name))?;
    info!(interface = %name, "interface created");

    Ok(created(TABLE, &name, "name", name_key(&envelope, &name), envelope))
}
