use serde::{Deserialize, Serialize};

use crate::access_tokens::AccessToken;
use crate::client::{require, Client};
use crate::error::ApiError;

#[derive(Debug, Serialize)]
struct CreateOrgTokenRequest<'a> {
    name: &'a str,
    description: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrgTokenResponse {
    id: String,
    token_value: String,
}

impl Client {
    pub async fn create_org_access_token(
        &self,
        name: &str,
        org_name: &str,
        description: &str,
    ) -> Result<AccessToken, ApiError> {
        require(org_name, "orgName")?;
        require(name, "name")?;

        let req = CreateOrgTokenRequest { name, description };
        let res: CreateOrgTokenResponse = self
            .post_json(&format!("orgs/{org_name}/tokens"), &req)
            .await?;
        Ok(AccessToken {
            id: res.id,
            token_value: res.token_value,
            description: description.to_string(),
            ..Default::default()
        })
    }

    pub async fn delete_org_access_token(
        &self,
        token_id: &str,
        org_name: &str,
    ) -> Result<(), ApiError> {
        require(token_id, "tokenId")?;
        require(org_name, "orgName")?;
        self.delete_no_content(&format!("orgs/{org_name}/tokens/{token_id}"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::create_test_client;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn create_org_access_token_posts_name_and_description() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/orgs/acme/tokens")
            .match_body(Matcher::Json(serde_json::json!({
                "name": "deploy",
                "description": "deploy token"
            })))
            .with_body(r#"{"id":"token1","tokenValue":"pul-abcdef"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let token = client
            .create_org_access_token("deploy", "acme", "deploy token")
            .await
            .unwrap();
        assert_eq!(token.id, "token1");
        assert_eq!(token.token_value, "pul-abcdef");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_org_access_token_validates_inputs() {
        let client = create_test_client("http://localhost:1");
        assert!(client
            .create_org_access_token("deploy", "", "d")
            .await
            .is_err());
        assert!(client.create_org_access_token("", "acme", "d").await.is_err());
    }

    #[tokio::test]
    async fn delete_org_access_token_issues_delete() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/orgs/acme/tokens/token1")
            .with_status(204)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        client
            .delete_org_access_token("token1", "acme")
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
