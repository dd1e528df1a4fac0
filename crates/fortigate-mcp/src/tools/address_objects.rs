//! Address object tools.

use fortigate_cmdb::{AddressObject, CmdbApi, CmdbTable};
use fortigate_core::Result;
use rmcp::schemars;
use serde_json::Value;
use tracing::{debug, info};

use super::{created, creation_error, get_or_list, name_key, name_param, object_param};

const TABLE: CmdbTable = CmdbTable::FirewallAddress;

/// Parameters for `get_address_object`.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct GetAddressObjectParams {
    /// Object name; all address objects are returned when omitted.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub object_name: Value,
}

/// Parameters for `create_address_object`.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateAddressObjectParams {
    /// Object fields. Required: name and type, plus subnet for ipmask,
    /// start-ip and end-ip for iprange, fqdn for fqdn.
    #[serde(default)]
    pub object_config: Value,
}

/// One address object by name, or all of them.
pub async fn get_address_object(api: &dyn CmdbApi, params: GetAddressObjectParams) -> Result<Value> {
    let name = name_param(&params.object_name, "object_name")?;
    get_or_list(
        api,
        TABLE,
        name.as_deref(),
        "address_object",
        "address_objects",
    )
    .await
}

/// Create an address object of the subtype named by `type`.
pub async fn create_address_object(
    api: &dyn CmdbApi,
    params: CreateAddressObjectParams,
) -> Result<Value> {
    let object = AddressObject::try_from(object_param(params.object_config, "object_config")?)?;
    let name = object.name().to_string();
    debug!(address = %name, kind = %object.kind().address_type(), "creating address object");

    let envelope = api
        .create(TABLE, object.into_payload())
        .await
        .map_err(|e| creation_error(e, TABLE, &name))?;
    info!(address = %name, "address object created");

    Ok(created(TABLE, &name, "name", name_key(&envelope, &name), envelope))
}
