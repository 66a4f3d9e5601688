use serde::{Deserialize, Serialize};

use crate::client::{require, Client};
use crate::error::ApiError;
use crate::user::UserInfo;

const ORG_ROLES: [&str; 2] = ["admin", "member"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub role: String,
    pub user: UserInfo,
    #[serde(default)]
    pub known_to_pulumi: bool,
    #[serde(default)]
    pub virtual_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Members {
    pub members: Vec<Member>,
}

#[derive(Debug, Serialize)]
struct AddMemberRequest<'a> {
    role: &'a str,
}

impl Client {
    pub async fn add_member_to_org(
        &self,
        user_name: &str,
        org_name: &str,
        role: &str,
    ) -> Result<(), ApiError> {
        require(user_name, "userName")?;
        require(org_name, "orgName")?;
        if !ORG_ROLES.contains(&role) {
            return Err(ApiError::Validation(format!(
                "role must be one of {ORG_ROLES:?}, got {role:?}"
            )));
        }
        self.post_no_content(
            &format!("orgs/{org_name}/members/{user_name}"),
            &AddMemberRequest { role },
        )
        .await
    }

    pub async fn list_org_members(&self, org_name: &str) -> Result<Members, ApiError> {
        require(org_name, "orgName")?;
        self.get_json_query(
            &format!("orgs/{org_name}/members"),
            &[("type", "backend".to_string())],
        )
        .await
    }

    pub async fn delete_member_from_org(
        &self,
        org_name: &str,
        user_name: &str,
    ) -> Result<(), ApiError> {
        require(org_name, "orgName")?;
        require(user_name, "userName")?;
        self.delete_no_content(&format!("orgs/{org_name}/members/{user_name}"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::create_test_client;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn add_member_rejects_unknown_role() {
        let client = create_test_client("http://localhost:1");
        let err = client
            .add_member_to_org("alice", "acme", "owner")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn add_member_posts_role() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/orgs/acme/members/alice")
            .match_body(Matcher::Json(serde_json::json!({"role": "member"})))
            .with_status(204)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        client
            .add_member_to_org("alice", "acme", "member")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn list_org_members_filters_backend_type() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/orgs/acme/members")
            .match_query(Matcher::UrlEncoded("type".into(), "backend".into()))
            .with_body(
                r#"{"members":[
                    {"role":"admin","user":{"name":"Alice","githubLogin":"alice"},"knownToPulumi":true},
                    {"role":"member","user":{"name":"Bob","githubLogin":"bob"}}
                ]}"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let members = client.list_org_members("acme").await.unwrap();
        assert_eq!(members.members.len(), 2);
        assert_eq!(members.members[0].user.github_login, "alice");
        assert!(members.members[0].known_to_pulumi);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn delete_member_issues_delete() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/orgs/acme/members/alice")
            .with_status(204)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        client.delete_member_from_org("acme", "alice").await.unwrap();
        mock.assert_async().await;
    }
}
