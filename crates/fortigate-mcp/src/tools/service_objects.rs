//! Custom service object tools.

use fortigate_cmdb::{CmdbApi, CmdbTable, ServiceObject};
use fortigate_core::Result;
use rmcp::schemars;
use serde_json::Value;
use tracing::{debug, info};

use super::{created, creation_error, get_or_list, name_key, name_param, object_param};

const TABLE: CmdbTable = CmdbTable::FirewallServiceCustom;

/// Parameters for `get_service_object`.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct GetServiceObjectParams {
    /// Service name; all custom services are returned when omitted.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub service_name: Value,
}

/// Parameters for `create_service_object`.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateServiceObjectParams {
    /// Service fields. Required: name and protocol (TCP/UDP/SCTP, ICMP,
    /// ICMP6 or IP). TCP/UDP/SCTP needs tcp-portrange, udp-portrange or
    /// sctp-portrange; IP needs protocol-number.
    #[serde(default)]
    pub service_config: Value,
}

/// One custom service by name, or all of them.
pub async fn get_service_object(api: &dyn CmdbApi, params: GetServiceObjectParams) -> Result<Value> {
    let name = name_param(&params.service_name, "service_name")?;
    get_or_list(
        api,
        TABLE,
        name.as_deref(),
        "service_object",
        "service_objects",
    )
    .await
}

/// Create a custom service of the subtype named by `protocol`.
pub async fn create_service_object(
    api: &dyn CmdbApi,
    params: CreateServiceObjectParams,
) -> Result<Value> {
    let service = ServiceObject::try_from(object_param(params.service_config, "service_config")?)?;
    let name = service.name().to_string();
    debug!(service = %name, protocol = %service.kind().protocol(), "creating service object");

    let envelope = api
        .create(TABLE, service.into_payload())
        .await
        .map_err(|e| creation_error(e, TABLE, &name))?;
    info!(service = %name, "service object created");

    Ok(created(TABLE, &name, "name", name_key(&envelope, &name), envelope))
}
