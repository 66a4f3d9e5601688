use serde::Deserialize;

use crate::client::Client;
use crate::error::ApiError;

/// Identity fields shared by member lists and collaborator lists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserInfo {
    pub name: String,
    pub github_login: String,
    pub avatar_url: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganizationSummary {
    pub name: String,
    pub github_login: String,
    pub avatar_url: String,
    /// none, member, admin, potential-member, stack-collaborator, billing-manager
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrentUser {
    pub id: String,
    pub github_login: String,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
    pub organizations: Vec<OrganizationSummary>,
    pub identities: Vec<String>,
    pub site_admin: Option<bool>,
    #[serde(rename = "hasMFA")]
    pub has_mfa: bool,
    pub is_org_managed: bool,
}

impl CurrentUser {
    /// First organization the user holds a standard role in, if any.
    pub fn default_organization(&self) -> Option<&str> {
        self.organizations
            .iter()
            .find(|o| matches!(o.role.as_str(), "member" | "admin" | "billing-manager"))
            .map(|o| o.name.as_str())
    }
}

impl Client {
    pub async fn get_current_user(&self) -> Result<CurrentUser, ApiError> {
        self.get_json("user").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::create_test_client;
    use mockito::Server;

    #[tokio::test]
    async fn get_current_user_decodes_organizations() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/user")
            .with_body(
                r#"{
                    "id":"user1",
                    "githubLogin":"alice",
                    "name":"Alice",
                    "email":"alice@example.com",
                    "hasMFA":true,
                    "organizations":[
                        {"name":"personal","role":"potential-member"},
                        {"name":"acme","role":"admin"}
                    ]
                }"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let user = client.get_current_user().await.unwrap();
        assert_eq!(user.github_login, "alice");
        assert!(user.has_mfa);
        assert_eq!(user.default_organization(), Some("acme"));
    }

    #[test]
    fn default_organization_skips_nonstandard_roles() {
        let user = CurrentUser {
            organizations: vec![OrganizationSummary {
                name: "acme".into(),
                role: "stack-collaborator".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(user.default_organization(), None);
    }
}
