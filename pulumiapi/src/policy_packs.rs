use std::collections::HashMap;

use serde::Deserialize;

use crate::client::{require, Client};
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyPackWithVersions {
    pub name: String,
    pub display_name: String,
    pub versions: Vec<i64>,
    pub version_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyComplianceFramework {
    pub name: String,
    pub version: String,
    pub reference: String,
    pub specification: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Policy {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub enforcement_level: String,
    pub message: String,
    pub config_schema: HashMap<String, serde_json::Value>,
    pub severity: String,
    pub framework: Option<PolicyComplianceFramework>,
    pub tags: Vec<String>,
    pub remediation_steps: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyPackDetail {
    pub name: String,
    pub display_name: String,
    pub version: i64,
    pub version_tag: String,
    pub config: HashMap<String, serde_json::Value>,
    pub policies: Vec<Policy>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPolicyPacksResponse {
    policy_packs: Vec<PolicyPackWithVersions>,
}

impl Client {
    pub async fn list_policy_packs(
        &self,
        org_name: &str,
    ) -> Result<Vec<PolicyPackWithVersions>, ApiError> {
        require(org_name, "orgName")?;
        let res: ListPolicyPacksResponse = self
            .get_json(&format!("orgs/{org_name}/policypacks"))
            .await?;
        Ok(res.policy_packs)
    }

    pub async fn get_policy_pack(
        &self,
        org_name: &str,
        policy_pack_name: &str,
        version: i64,
    ) -> Result<Option<PolicyPackDetail>, ApiError> {
        require(org_name, "orgName")?;
        require(policy_pack_name, "policyPackName")?;
        match self
            .get_json(&format!(
                "orgs/{org_name}/policypacks/{policy_pack_name}/versions/{version}"
            ))
            .await
        {
            Ok(pack) => Ok(Some(pack)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn get_latest_policy_pack(
        &self,
        org_name: &str,
        policy_pack_name: &str,
    ) -> Result<Option<PolicyPackDetail>, ApiError> {
        require(org_name, "orgName")?;
        require(policy_pack_name, "policyPackName")?;
        match self
            .get_json(&format!(
                "orgs/{org_name}/policypacks/{policy_pack_name}/latest"
            ))
            .await
        {
            Ok(pack) => Ok(Some(pack)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
