//! Firewall policy tools.

use fortigate_cmdb::{CmdbApi, CmdbTable, MovePosition, PolicyConfig, PolicyUpdate};
use fortigate_core::ids::PolicyId;
use fortigate_core::Result;
use rmcp::schemars;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{created, creation_error, key_param, mkey_of, object_param, text_param};

const TABLE: CmdbTable = CmdbTable::FirewallPolicy;

/// Parameters for tools addressing one policy.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct PolicyIdParams {
    /// Numeric policy ID (`policyid`).
    #[serde(default)]
    #[schemars(with = "u32")]
    pub policy_id: Value,
}

/// Parameters for `create_policy`.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreatePolicyParams {
    /// Policy fields. Required: name, srcintf, dstintf, srcaddr, dstaddr,
    /// action (accept|deny|ipsec), schedule, service, status (enable|disable).
    /// Interface, address and service fields are lists like `[{"name": "port1"}]`.
    #[serde(default)]
    pub policy_config: Value,
}

/// Parameters for `update_policy`.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct UpdatePolicyParams {
    /// Numeric policy ID (`policyid`).
    #[serde(default)]
    #[schemars(with = "u32")]
    pub policy_id: Value,
    /// Fields to change; anything omitted is left as is.
    #[serde(default)]
    pub policy_config: Value,
}

/// Parameters for `reorder_policies`.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ReorderPoliciesParams {
    /// Policy to move.
    #[serde(default)]
    #[schemars(with = "u32")]
    pub policy_id: Value,
    /// Policy the moved one is placed next to.
    #[serde(default)]
    #[schemars(with = "u32")]
    pub reference_id: Value,
    /// "before" or "after" the reference policy.
    #[serde(default)]
    #[schemars(with = "String")]
    pub position: Value,
}

/// Fetch one policy.
pub async fn get_policy_details(api: &dyn CmdbApi, params: PolicyIdParams) -> Result<Value> {
    let id: PolicyId = key_param(&params.policy_id, "policy_id")?;
    api.get(TABLE, &id.to_string()).await
}

/// Create a policy from a validated configuration.
pub async fn create_policy(api: &dyn CmdbApi, params: CreatePolicyParams) -> Result<Value> {
    let config = PolicyConfig::try_from(object_param(params.policy_config, "policy_config")?)?;
    let name = config.name().to_string();
    debug!(policy = %name, action = %config.action(), "creating firewall policy");

    let envelope = api
        .create(TABLE, config.into_payload())
        .await
        .map_err(|e| creation_error(e, TABLE, &name))?;
    let policy_id = mkey_of(&envelope);
    info!(policy = %name, %policy_id, "firewall policy created");

    Ok(created(TABLE, &name, "policy_id", policy_id, envelope))
}

/// List every policy of the VDOM.
pub async fn list_policies(api: &dyn CmdbApi) -> Result<Value> {
    let policies = api.list(TABLE).await?;
    let count = policies.len();
    Ok(json!({ "policies": policies, "count": count }))
}

/// Change fields of an existing policy.
pub async fn update_policy(api: &dyn CmdbApi, params: UpdatePolicyParams) -> Result<Value> {
    let id: PolicyId = key_param(&params.policy_id, "policy_id")?;
    let update = PolicyUpdate::new(id, object_param(params.policy_config, "policy_config")?)?;

    let envelope = api
        .update(TABLE, &id.to_string(), update.into_payload())
        .await?;
    info!(policy_id = %id, "firewall policy updated");

    Ok(json!({
        "status": "success",
        "message": format!("Firewall policy {id} updated successfully."),
        "policy_id": id,
        "details": envelope,
    }))
}

/// Delete a policy. A policy that is already gone counts as deleted.
pub async fn delete_policy(api: &dyn CmdbApi, params: PolicyIdParams) -> Result<Value> {
    let id: PolicyId = key_param(&params.policy_id, "policy_id")?;
    let message = match api.delete(TABLE, &id.to_string()).await {
        Ok(_) => format!("Firewall policy {id} deleted successfully."),
        Err(err) if err.is_not_found() => {
            debug!(policy_id = %id, "policy was not present");
            format!("Firewall policy {id} not found or already deleted.")
        }
        Err(err) => return Err(err),
    };
    info!(policy_id = %id, "firewall policy deleted");

    Ok(json!({
        "status": "success",
        "message": message,
        "policy_id": id,
    }))
}

/// Move a policy before or after another one.
///
/// The resulting order is the device's business; this forwards one move.
pub async fn reorder_policies(api: &dyn CmdbApi, params: ReorderPoliciesParams) -> Result<Value> {
    let id: PolicyId = key_param(&params.policy_id, "policy_id")?;
    let reference: PolicyId = key_param(&params.reference_id, "reference_id")?;
    let position: MovePosition = text_param(&params.position, "position")?.parse()?;

    let envelope = api
        .move_entry(TABLE, &id.to_string(), position, &reference.to_string())
        .await?;
    info!(policy_id = %id, %position, reference = %reference, "firewall policy moved");

    Ok(json!({
        "status": "success",
        "message": format!("Firewall policy {id} moved {position} policy {reference}."),
        "policy_id": id,
        "details": envelope,
    }))
}
