//! Static route tools.

use fortigate_cmdb::{CmdbApi, CmdbTable, StaticRouteConfig};
use fortigate_core::ids::RouteSeqNum;
use fortigate_core::Result;
use rmcp::schemars;
use serde_json::Value;
use tracing::{debug, info};

use super::{created, creation_error, get_or_list, mkey_of, object_param, optional_key_param};

const TABLE: CmdbTable = CmdbTable::RouterStatic;

/// Parameters for `get_static_routes`.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct GetStaticRoutesParams {
    /// Route sequence number (`seq-num`); all routes are returned when omitted.
    #[serde(default)]
    #[schemars(with = "Option<u32>")]
    pub route_seq_num: Value,
}

/// Parameters for `create_static_route`.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateStaticRouteParams {
    /// Route fields. Required: dst ("10.0.0.0 255.0.0.0"), gateway, device.
    /// status defaults to enable.
    #[serde(default)]
    pub route_config: Value,
}

/// One route by sequence number, or the whole routing table.
pub async fn get_static_routes(api: &dyn CmdbApi, params: GetStaticRoutesParams) -> Result<Value> {
    let key = optional_key_param::<RouteSeqNum>(&params.route_seq_num, "route_seq_num")?
        .map(|seq| seq.to_string());
    get_or_list(api, TABLE, key.as_deref(), "static_route", "static_routes").await
}

/// Create a static route. The device assigns the sequence number.
pub async fn create_static_route(
    api: &dyn CmdbApi,
    params: CreateStaticRouteParams,
) -> Result<Value> {
    let config = StaticRouteConfig::try_from(object_param(params.route_config, "route_config")?)?;
    let label = format!("{} via {}", config.dst(), config.gateway());
    debug!(route = %label, device = config.device(), "creating static route");

    let envelope = api
        .create(TABLE, config.into_payload())
        .await
        .map_err(|e| creation_error(e, TABLE, &label))?;
    let seq_num = mkey_of(&envelope);
    info!(route = %label, %seq_num, "static route created");

    Ok(created(TABLE, &label, "seq-num", seq_num, envelope))
}
