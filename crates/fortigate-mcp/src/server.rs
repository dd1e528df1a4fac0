//! Core MCP server implementation for FortiGate.

use std::sync::Arc;

use rmcp::{
    handler::server::wrapper::Parameters, model::*, tool, tool_handler, tool_router,
    transport::stdio, ErrorData as McpError, ServerHandler, ServiceExt,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use fortigate_cmdb::CmdbApi;

use crate::response::into_call_result;
use crate::tools::address_objects::{self, CreateAddressObjectParams, GetAddressObjectParams};
use crate::tools::interfaces::{self, CreateInterfaceParams, GetInterfacesParams};
use crate::tools::policies::{
    self, CreatePolicyParams, PolicyIdParams, ReorderPoliciesParams, UpdatePolicyParams,
};
use crate::tools::service_groups::{self, CreateServiceGroupParams, GetServiceGroupParams};
use crate::tools::service_objects::{self, CreateServiceObjectParams, GetServiceObjectParams};
use crate::tools::static_routes::{self, CreateStaticRouteParams, GetStaticRoutesParams};
use crate::tools::traffic_logs::{self, TrafficLogParams};

/// MCP server for one FortiGate session.
///
/// Each tool locks the session for the duration of its single device call,
/// so concurrent tool calls reach the device one at a time.
#[derive(Clone)]
pub struct FortiGateMcpServer {
    api: Arc<Mutex<Box<dyn CmdbApi>>>,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<FortiGateMcpServer>,
}

#[tool_router]
impl FortiGateMcpServer {
    /// Create a server around an open session.
    pub fn new(api: impl CmdbApi + 'static) -> Self {
        Self {
            api: Arc::new(Mutex::new(Box::new(api))),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Get the full configuration of one firewall policy by its numeric ID.")]
    async fn get_policy_details(
        &self,
        Parameters(params): Parameters<PolicyIdParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "get_policy_details", policy_id = %params.policy_id);
        let api = self.api.lock().await;
        let result = policies::get_policy_details(&**api, params).await;
        Ok(into_call_result("get_policy_details", result))
    }

    #[tool(
        description = "Create a firewall policy. policy_config must contain name, srcintf, dstintf, \
        srcaddr, dstaddr, action (accept|deny|ipsec), schedule, service and status (enable|disable). \
        Interface, address and service fields are lists like [{\"name\": \"port1\"}]. \
        Other FortiOS policy fields (nat, logtraffic, comments) are passed through."
    )]
    async fn create_policy(
        &self,
        Parameters(params): Parameters<CreatePolicyParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "create_policy");
        let api = self.api.lock().await;
        let result = policies::create_policy(&**api, params).await;
        Ok(into_call_result("create_policy", result))
    }

    #[tool(description = "List every firewall policy in the configured VDOM, in evaluation order.")]
    async fn list_policies(&self) -> Result<CallToolResult, McpError> {
        info!(tool = "list_policies");
        let api = self.api.lock().await;
        let result = policies::list_policies(&**api).await;
        Ok(into_call_result("list_policies", result))
    }

    #[tool(
        description = "Update fields of an existing firewall policy. Only the fields given in \
        policy_config are changed."
    )]
    async fn update_policy(
        &self,
        Parameters(params): Parameters<UpdatePolicyParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "update_policy", policy_id = %params.policy_id);
        let api = self.api.lock().await;
        let result = policies::update_policy(&**api, params).await;
        Ok(into_call_result("update_policy", result))
    }

    #[tool(
        description = "Delete a firewall policy by its numeric ID. Deleting a policy that does \
        not exist is reported as success."
    )]
    async fn delete_policy(
        &self,
        Parameters(params): Parameters<PolicyIdParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "delete_policy", policy_id = %params.policy_id);
        let api = self.api.lock().await;
        let result = policies::delete_policy(&**api, params).await;
        Ok(into_call_result("delete_policy", result))
    }

    #[tool(
        description = "Move a firewall policy before or after another policy. position is \
        \"before\" or \"after\" relative to reference_id."
    )]
    async fn reorder_policies(
        &self,
        Parameters(params): Parameters<ReorderPoliciesParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(
            tool = "reorder_policies",
            policy_id = %params.policy_id,
            reference_id = %params.reference_id
        );
        let api = self.api.lock().await;
        let result = policies::reorder_policies(&**api, params).await;
        Ok(into_call_result("reorder_policies", result))
    }

    #[tool(description = "Get one network interface by name, or all interfaces when no name is given.")]
    async fn get_interfaces(
        &self,
        Parameters(params): Parameters<GetInterfacesParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "get_interfaces");
        let api = self.api.lock().await;
        let result = interfaces::get_interfaces(&**api, params).await;
        Ok(into_call_result("get_interfaces", result))
    }

    #[tool(
        description = "Create a network interface. interface_config needs name and type; VLANs \
        also need vlanid, interface (parent) and ip (\"192.168.10.1 255.255.255.0\"); \
        loopbacks need ip."
    )]
    async fn create_interface(
        &self,
        Parameters(params): Parameters<CreateInterfaceParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "create_interface");
        let api = self.api.lock().await;
        let result = interfaces::create_interface(&**api, params).await;
        Ok(into_call_result("create_interface", result))
    }

    #[tool(description = "Get one static route by sequence number, or all static routes.")]
    async fn get_static_routes(
        &self,
        Parameters(params): Parameters<GetStaticRoutesParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "get_static_routes");
        let api = self.api.lock().await;
        let result = static_routes::get_static_routes(&**api, params).await;
        Ok(into_call_result("get_static_routes", result))
    }

    #[tool(
        description = "Create a static route. route_config needs dst (\"10.0.0.0 255.0.0.0\"), \
        gateway and device; status defaults to enable."
    )]
    async fn create_static_route(
        &self,
        Parameters(params): Parameters<CreateStaticRouteParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "create_static_route");
        let api = self.api.lock().await;
        let result = static_routes::create_static_route(&**api, params).await;
        Ok(into_call_result("create_static_route", result))
    }

    #[tool(description = "Get one address object by name, or all address objects.")]
    async fn get_address_object(
        &self,
        Parameters(params): Parameters<GetAddressObjectParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "get_address_object");
        let api = self.api.lock().await;
        let result = address_objects::get_address_object(&**api, params).await;
        Ok(into_call_result("get_address_object", result))
    }

    #[tool(
        description = "Create an address object. object_config needs name and type: ipmask \
        (with subnet), iprange (with start-ip and end-ip) or fqdn (with fqdn)."
    )]
    async fn create_address_object(
        &self,
        Parameters(params): Parameters<CreateAddressObjectParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "create_address_object");
        let api = self.api.lock().await;
        let result = address_objects::create_address_object(&**api, params).await;
        Ok(into_call_result("create_address_object", result))
    }

    #[tool(description = "Get one custom service object by name, or all custom services.")]
    async fn get_service_object(
        &self,
        Parameters(params): Parameters<GetServiceObjectParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "get_service_object");
        let api = self.api.lock().await;
        let result = service_objects::get_service_object(&**api, params).await;
        Ok(into_call_result("get_service_object", result))
    }

    #[tool(
        description = "Create a custom service object. service_config needs name and protocol: \
        TCP/UDP/SCTP (with tcp-portrange, udp-portrange or sctp-portrange), ICMP or ICMP6 \
        (optional icmptype, icmpcode) or IP (with protocol-number)."
    )]
    async fn create_service_object(
        &self,
        Parameters(params): Parameters<CreateServiceObjectParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "create_service_object");
        let api = self.api.lock().await;
        let result = service_objects::create_service_object(&**api, params).await;
        Ok(into_call_result("create_service_object", result))
    }

    #[tool(description = "Get one service group by name, or all service groups.")]
    async fn get_service_group(
        &self,
        Parameters(params): Parameters<GetServiceGroupParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "get_service_group");
        let api = self.api.lock().await;
        let result = service_groups::get_service_group(&**api, params).await;
        Ok(into_call_result("get_service_group", result))
    }

    #[tool(
        description = "Create a service group. group_config needs name and member, a list like \
        [{\"name\": \"HTTP\"}, {\"name\": \"HTTPS\"}]."
    )]
    async fn create_service_group(
        &self,
        Parameters(params): Parameters<CreateServiceGroupParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "create_service_group");
        let api = self.api.lock().await;
        let result = service_groups::create_service_group(&**api, params).await;
        Ok(into_call_result("create_service_group", result))
    }

    #[tool(
        description = "Traffic logs. NOT IMPLEMENTED: always returns the same fixed sample \
        entries, marked with source \"sample\", whatever the filters."
    )]
    async fn get_traffic_logs(
        &self,
        Parameters(params): Parameters<TrafficLogParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "get_traffic_logs");
        let body = traffic_logs::get_traffic_logs(&params);
        Ok(into_call_result("get_traffic_logs", Ok(body)))
    }

    /// Serve MCP over stdio (stdin/stdout).
    ///
    /// This method blocks until the connection is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails to start or breaks down.
    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        debug!("starting MCP server on stdio");
        let service = self
            .serve(stdio())
            .await
            .map_err(|e| anyhow::anyhow!("failed to start MCP server: {e}"))?;
        service
            .waiting()
            .await
            .map_err(|e| anyhow::anyhow!("MCP server error: {e}"))?;
        Ok(())
    }
}

#[tool_handler]
impl ServerHandler for FortiGateMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "FortiGate MCP server. Tools read and change firewall policies, interfaces, \
                 static routes, address objects, service objects and service groups on one \
                 FortiGate VDOM. Every tool returns a JSON mapping; failures carry an \"error\" \
                 key. get_traffic_logs returns sample data only."
                    .into(),
            ),
        }
    }
}
