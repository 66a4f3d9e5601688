use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::client::{require, Client};
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyGroupSummary {
    pub name: String,
    pub is_org_default: bool,
    pub num_stacks: i64,
    pub num_accounts: i64,
    pub entity_type: String,
    pub num_enabled_policy_packs: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StackReference {
    pub name: String,
    pub routing_project: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyPackMetadata {
    pub name: String,
    pub display_name: String,
    pub version: i64,
    pub version_tag: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub config: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyGroup {
    pub name: String,
    pub is_org_default: bool,
    pub stacks: Vec<StackReference>,
    pub applied_policy_packs: Vec<PolicyPackMetadata>,
    pub accounts: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPolicyGroupsResponse {
    policy_groups: Vec<PolicyGroupSummary>,
}

#[derive(Debug, Serialize)]
struct CreatePolicyGroupRequest<'a> {
    name: &'a str,
}

/// Mutations on a policy group are expressed as a sparse patch; only the
/// populated field is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePolicyGroupRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_stack: Option<StackReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_stack: Option<StackReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_policy_pack: Option<PolicyPackMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_policy_pack: Option<PolicyPackMetadata>,
}

impl Client {
    pub async fn list_policy_groups(
        &self,
        org_name: &str,
    ) -> Result<Vec<PolicyGroupSummary>, ApiError> {
        require(org_name, "orgName")?;
        let res: ListPolicyGroupsResponse = self
            .get_json(&format!("orgs/{org_name}/policygroups"))
            .await?;
        Ok(res.policy_groups)
    }

    pub async fn get_policy_group(
        &self,
        org_name: &str,
        policy_group_name: &str,
    ) -> Result<Option<PolicyGroup>, ApiError> {
        require(org_name, "orgName")?;
        require(policy_group_name, "policyGroupName")?;
        match self
            .get_json(&format!("orgs/{org_name}/policygroups/{policy_group_name}"))
            .await
        {
            Ok(group) => Ok(Some(group)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn create_policy_group(
        &self,
        org_name: &str,
        policy_group_name: &str,
    ) -> Result<(), ApiError> {
        require(org_name, "orgName")?;
        require(policy_group_name, "policyGroupName")?;
        self.post_no_content(
            &format!("orgs/{org_name}/policygroups"),
            &CreatePolicyGroupRequest {
                name: policy_group_name,
            },
        )
        .await
    }

    pub async fn update_policy_group(
        &self,
        org_name: &str,
        policy_group_name: &str,
        req: &UpdatePolicyGroupRequest,
    ) -> Result<(), ApiError> {
        require(org_name, "orgName")?;
        require(policy_group_name, "policyGroupName")?;
        self.patch_no_content(
            &format!("orgs/{org_name}/policygroups/{policy_group_name}"),
            req,
        )
        .await
    }

    pub async fn delete_policy_group(
        &self,
        org_name: &str,
        policy_group_name: &str,
    ) -> Result<(), ApiError> {
        require(org_name, "orgName")?;
        require(policy_group_name, "policyGroupName")?;
        self.delete_no_content(&format!("orgs/{org_name}/policygroups/{policy_group_name}"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::create_test_client;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn list_policy_groups_unwraps_envelope() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/orgs/acme/policygroups")
            .with_body(
                r#"{"policyGroups":[
                    {"name":"default-policy-group","isOrgDefault":true,"numStacks":4,
                     "numAccounts":0,"entityType":"stacks","numEnabledPolicyPacks":1}
                ]}"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let groups = client.list_policy_groups("acme").await.unwrap();
        assert_eq!(groups.len(), 1);
        assert!(groups[0].is_org_default);
    }

    #[tokio::test]
    async fn get_policy_group_maps_404_to_none() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/orgs/acme/policygroups/compliance")
            .with_status(404)
            .with_body(r#"{"code":404,"message":"not found"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        assert!(client
            .get_policy_group("acme", "compliance")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn update_policy_group_sends_sparse_patch() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/api/orgs/acme/policygroups/compliance")
            .match_body(Matcher::Json(serde_json::json!({
                "addStack": {"name": "prod", "routingProject": "website"}
            })))
            .with_status(204)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        client
            .update_policy_group(
                "acme",
                "compliance",
                &UpdatePolicyGroupRequest {
                    add_stack: Some(StackReference {
                        name: "prod".into(),
                        routing_project: "website".into(),
                    }),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_policy_group_posts_name() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/orgs/acme/policygroups")
            .match_body(Matcher::Json(serde_json::json!({"name": "compliance"})))
            .with_status(204)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        client
            .create_policy_group("acme", "compliance")
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
