use serde::{Deserialize, Serialize};

use crate::client::{require, Client};
use crate::error::ApiError;

/// A Pulumi Cloud access token. `token_value` is only populated on create;
/// the service never returns it again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessToken {
    pub id: String,
    pub name: String,
    pub token_value: String,
    pub description: String,
    pub admin: bool,
}

#[derive(Debug, Serialize)]
struct CreateTokenRequest<'a> {
    description: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTokenResponse {
    id: String,
    token_value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenResponse {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    admin: bool,
}

#[derive(Debug, Deserialize)]
struct ListTokenResponse {
    tokens: Vec<AccessTokenResponse>,
}

impl Client {
    pub async fn create_access_token(&self, description: &str) -> Result<AccessToken, ApiError> {
        let req = CreateTokenRequest { description };
        let res: CreateTokenResponse = self.post_json("user/tokens", &req).await?;
        Ok(AccessToken {
            id: res.id,
            token_value: res.token_value,
            description: description.to_string(),
            ..Default::default()
        })
    }

    pub async fn delete_access_token(&self, token_id: &str) -> Result<(), ApiError> {
        require(token_id, "tokenId")?;
        self.delete_no_content(&format!("user/tokens/{token_id}"))
            .await
    }

    /// Look up a token by id. The list endpoint is the only way to read
    /// tokens back; absence yields `None`.
    pub async fn get_access_token(&self, id: &str) -> Result<Option<AccessToken>, ApiError> {
        let list: ListTokenResponse = self.get_json("user/tokens").await?;
        Ok(list.tokens.into_iter().find(|t| t.id == id).map(|t| {
            AccessToken {
                id: t.id,
                name: t.name,
                description: t.description,
                admin: t.admin,
                ..Default::default()
            }
        }))
    }
}
