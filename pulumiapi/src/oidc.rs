use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OidcIssuerRegistrationRequest {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub thumbprints: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_expiration: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OidcIssuerUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbprints: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_expiration: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OidcIssuer {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub thumbprints: Vec<String>,
    pub max_expiration: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPolicyDefinition {
    pub decision: String,
    pub token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_login: Option<String>,
    #[serde(rename = "runnerID", skip_serializing_if = "Option::is_none")]
    pub runner_id: Option<String>,
    #[serde(default)]
    pub authorized_permissions: Vec<String>,
    #[serde(default)]
    pub rules: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPolicy {
    pub id: String,
    pub version: i64,
    pub created: Option<String>,
    pub modified: Option<String>,
    #[serde(rename = "policies", default)]
    pub definition: Vec<AuthPolicyDefinition>,
}

#[derive(Debug, Serialize)]
struct AuthPolicyUpdateRequest<'a> {
    policies: &'a [AuthPolicyDefinition],
}

impl Client {
    pub async fn register_oidc_issuer(
        &self,
        org_name: &str,
        req: &OidcIssuerRegistrationRequest,
    ) -> Result<OidcIssuer, ApiError> {
        self.post_json(&format!("orgs/{org_name}/oidc/issuers"), req)
            .await
    }

    pub async fn update_oidc_issuer(
        &self,
        org_name: &str,
        issuer_id: &str,
        req: &OidcIssuerUpdateRequest,
    ) -> Result<OidcIssuer, ApiError> {
        self.patch_json(&format!("orgs/{org_name}/oidc/issuers/{issuer_id}"), req)
            .await
    }

    pub async fn get_oidc_issuer(
        &self,
        org_name: &str,
        issuer_id: &str,
    ) -> Result<Option<OidcIssuer>, ApiError> {
        match self
            .get_json(&format!("orgs/{org_name}/oidc/issuers/{issuer_id}"))
            .await
        {
            Ok(issuer) => Ok(Some(issuer)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Deleting an already-deleted issuer is not an error.
    pub async fn delete_oidc_issuer(
        &self,
        org_name: &str,
        issuer_id: &str,
    ) -> Result<(), ApiError> {
        match self
            .delete_no_content(&format!("orgs/{org_name}/oidc/issuers/{issuer_id}"))
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn get_auth_policies(
        &self,
        org_name: &str,
        issuer_id: &str,
    ) -> Result<AuthPolicy, ApiError> {
        self.get_json(&format!(
            "orgs/{org_name}/auth/policies/oidcissuers/{issuer_id}"
        ))
        .await
    }

    pub async fn update_auth_policies(
        &self,
        org_name: &str,
        policy_id: &str,
        policies: &[AuthPolicyDefinition],
    ) -> Result<AuthPolicy, ApiError> {
        self.patch_json(
            &format!("orgs/{org_name}/auth/policies/{policy_id}"),
            &AuthPolicyUpdateRequest { policies },
        )
        .await
    }
}
