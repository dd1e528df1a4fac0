//! Service group tools.

use fortigate_cmdb::{CmdbApi, CmdbTable, ServiceGroup};
use fortigate_core::Result;
use rmcp::schemars;
use serde_json::Value;
use tracing::info;

use super::{created, creation_error, get_or_list, name_key, name_param, object_param};

const TABLE: CmdbTable = CmdbTable::FirewallServiceGroup;

/// Parameters for `get_service_group`.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct GetServiceGroupParams {
    /// Group name; all groups are returned when omitted.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub group_name: Value,
}

/// Parameters for `create_service_group`.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateServiceGroupParams {
    /// Group fields. Required: name and member, a list like `[{"name": "HTTP"}]`.
    #[serde(default)]
    pub group_config: Value,
}

/// One group by name, or all of them.
pub async fn get_service_group(api: &dyn CmdbApi, params: GetServiceGroupParams) -> Result<Value> {
    let name = name_param(&params.group_name, "group_name")?;
    get_or_list(
        api,
        TABLE,
        name.as_deref(),
        "service_group",
        "service_groups",
    )
    .await
}

/// Create a service group.
pub async fn create_service_group(
    api: &dyn CmdbApi,
    params: CreateServiceGroupParams,
) -> Result<Value> {
    let group = ServiceGroup::try_from(object_param(params.group_config, "group_config")?)?;
    let name = group.name().to_string();
    let members = group.members().len();

    let envelope = api
        .create(TABLE, group.into_payload())
        .await
        .map_err(|e| creation_error(e, TABLE, &name))?;
    info!(group = %name, members, "service group created");

    Ok(created(TABLE, &name, "name", name_key(&envelope, &name), envelope))
}
