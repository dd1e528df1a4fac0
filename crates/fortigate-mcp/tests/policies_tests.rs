mod helpers;

use fortigate_cmdb::{CmdbTable, MockCmdbApi, MovePosition};
use fortigate_core::Error;
use fortigate_mcp::tools::policies::{
    create_policy, delete_policy, get_policy_details, list_policies, reorder_policies,
    CreatePolicyParams, PolicyIdParams, ReorderPoliciesParams,
};
use helpers::{as_tool_result, error_body, get_json, is_error, is_success};
use mockall::predicate::eq;
use serde_json::{json, Value};

fn valid_policy() -> Value {
    json!({
        "name": "MCP_Policy_01",
        "srcintf": [{"name": "port1"}],
        "dstintf": [{"name": "port2"}],
        "srcaddr": [{"name": "all"}],
        "dstaddr": [{"name": "all"}],
        "action": "accept",
        "schedule": "always",
        "service": [{"name": "HTTPS"}],
        "status": "enable",
        "logtraffic": "all"
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_policy_details_is_idempotent() {
        let mut mock = MockCmdbApi::new();
        mock.expect_get()
            .with(eq(CmdbTable::FirewallPolicy), eq("7"))
            .times(2)
            .returning(|_, _| Ok(json!({"policyid": 7, "name": "web-out", "action": "accept"})));

        let first = get_policy_details(&mock, PolicyIdParams { policy_id: json!(7) })
            .await
            .unwrap();
        let second = get_policy_details(&mock, PolicyIdParams { policy_id: json!(7) })
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first["name"], "web-out");
    }

    #[tokio::test]
    async fn test_get_policy_details_remote_error() {
        let mut mock = MockCmdbApi::new();
        mock.expect_get()
            .times(1)
            .returning(|_, _| Err(Error::remote(500, r#"{"error":"internal"}"#)));

        let result = as_tool_result(get_policy_details(&mock, PolicyIdParams { policy_id: json!(1) }).await);
        assert!(is_error(&result));
        let body = get_json(&result);
        assert_eq!(body["details"], json!({"error": "internal"}));
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_create_policy_success() {
        let mut mock = MockCmdbApi::new();
        mock.expect_create()
            .withf(|table, payload| {
                *table == CmdbTable::FirewallPolicy
                    && payload["name"] == "MCP_Policy_01"
                    && payload["logtraffic"] == "all"
            })
            .times(1)
            .returning(|_, _| Ok(json!({"status": "success", "http_status": 200, "mkey": 12})));

        let result = as_tool_result(
            create_policy(
                &mock,
                CreatePolicyParams {
                    policy_config: valid_policy(),
                },
            )
            .await,
        );
        assert!(is_success(&result));
        let body = get_json(&result);
        assert_eq!(body["status"], "success");
        assert_eq!(body["policy_id"], 12);
        assert_eq!(body["details"]["mkey"], 12);
    }

    #[tokio::test]
    async fn test_create_policy_missing_field_makes_no_call() {
        for field in ["name", "srcintf", "action", "schedule", "status"] {
            let mut mock = MockCmdbApi::new();
            mock.expect_create().never();

            let mut config = valid_policy();
            config.as_object_mut().unwrap().remove(field);
            let body = error_body(
                create_policy(&mock, CreatePolicyParams { policy_config: config }).await,
            );
            assert!(
                body["error"].as_str().unwrap().contains(field),
                "{field}: {body}"
            );
        }
    }

    #[tokio::test]
    async fn test_create_policy_rejects_non_object() {
        let mut mock = MockCmdbApi::new();
        mock.expect_create().never();

        let err = create_policy(
            &mock,
            CreatePolicyParams {
                policy_config: json!(["not", "a", "mapping"]),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_create_policy_duplicate() {
        let mut mock = MockCmdbApi::new();
        mock.expect_create().times(1).returning(|_, _| {
            Err(Error::from_envelope(json!({
                "status": "error",
                "http_status": 500,
                "error": -5
            })))
        });

        let body = error_body(
            create_policy(
                &mock,
                CreatePolicyParams {
                    policy_config: valid_policy(),
                },
            )
            .await,
        );
        assert!(body["error"].as_str().unwrap().contains("may already exist"));
        assert_eq!(body["details"]["error"], -5);
    }

    #[tokio::test]
    async fn test_list_policies_counts() {
        let mut mock = MockCmdbApi::new();
        mock.expect_list()
            .with(eq(CmdbTable::FirewallPolicy))
            .times(1)
            .returning(|_| Ok(vec![json!({"policyid": 1}), json!({"policyid": 2})]));

        let body = list_policies(&mock).await.unwrap();
        assert_eq!(body["count"], 2);
        assert_eq!(body["policies"][1]["policyid"], 2);
    }

    #[tokio::test]
    async fn test_delete_policy_success() {
        let mut mock = MockCmdbApi::new();
        mock.expect_delete()
            .with(eq(CmdbTable::FirewallPolicy), eq("9"))
            .times(1)
            .returning(|_, _| Ok(json!({"status": "success"})));

        let body = delete_policy(&mock, PolicyIdParams { policy_id: json!(9) })
            .await
            .unwrap();
        assert_eq!(body["status"], "success");
        assert_eq!(body["policy_id"], 9);
    }

    #[tokio::test]
    async fn test_delete_missing_policy_reports_success() {
        let mut mock = MockCmdbApi::new();
        mock.expect_delete().times(1).returning(|_, _| {
            Err(Error::remote(
                404,
                r#"{"status":"error","http_status":404,"error":-3}"#,
            ))
        });

        let body = delete_policy(&mock, PolicyIdParams { policy_id: json!(42) })
            .await
            .unwrap();
        assert_eq!(body["status"], "success");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("not found or already deleted"));
    }

    #[tokio::test]
    async fn test_delete_policy_other_failure_is_error() {
        let mut mock = MockCmdbApi::new();
        mock.expect_delete()
            .times(1)
            .returning(|_, _| Err(Error::Connectivity("connection refused".into())));

        let body = error_body(delete_policy(&mock, PolicyIdParams { policy_id: json!(42) }).await);
        assert!(body["error"].as_str().unwrap().contains("connection refused"));
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_reorder_forwards_single_move() {
        let mut mock = MockCmdbApi::new();
        mock.expect_move_entry()
            .with(
                eq(CmdbTable::FirewallPolicy),
                eq("3"),
                eq(MovePosition::After),
                eq("1"),
            )
            .times(1)
            .returning(|_, _, _, _| Ok(json!({"status": "success", "mkey": "3"})));

        let body = reorder_policies(
            &mock,
            ReorderPoliciesParams {
                policy_id: json!(3),
                reference_id: json!(1),
                position: json!("after"),
            },
        )
        .await
        .unwrap();
        assert_eq!(body["status"], "success");
        assert_eq!(body["policy_id"], 3);
    }
}
