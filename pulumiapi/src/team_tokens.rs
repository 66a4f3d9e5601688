use serde::{Deserialize, Serialize};

use crate::access_tokens::AccessToken;
use crate::client::{require, Client};
use crate::error::ApiError;

#[derive(Debug, Serialize)]
struct CreateTeamTokenRequest<'a> {
    name: &'a str,
    description: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTeamTokenResponse {
    id: String,
    token_value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamTokenSummary {
    id: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ListTeamTokenResponse {
    tokens: Vec<TeamTokenSummary>,
}

impl Client {
    pub async fn create_team_access_token(
        &self,
        name: &str,
        org_name: &str,
        team_name: &str,
        description: &str,
    ) -> Result<AccessToken, ApiError> {
        require(org_name, "orgName")?;
        require(team_name, "teamName")?;

        let req = CreateTeamTokenRequest { name, description };
        let res: CreateTeamTokenResponse = self
            .post_json(&format!("orgs/{org_name}/teams/{team_name}/tokens"), &req)
            .await?;
        Ok(AccessToken {
            id: res.id,
            token_value: res.token_value,
            description: description.to_string(),
            ..Default::default()
        })
    }

    pub async fn delete_team_access_token(
        &self,
        token_id: &str,
        org_name: &str,
        team_name: &str,
    ) -> Result<(), ApiError> {
        require(token_id, "tokenId")?;
        require(team_name, "teamName")?;
        require(org_name, "orgName")?;
        self.delete_no_content(&format!(
            "orgs/{org_name}/teams/{team_name}/tokens/{token_id}"
        ))
        .await
    }

    pub async fn get_team_access_token(
        &self,
        token_id: &str,
        org_name: &str,
        team_name: &str,
    ) -> Result<Option<AccessToken>, ApiError> {
        let list: ListTeamTokenResponse = self
            .get_json(&format!("orgs/{org_name}/teams/{team_name}/tokens"))
            .await?;
        Ok(list.tokens.into_iter().find(|t| t.id == token_id).map(|t| {
            AccessToken {
                id: t.id,
                description: t.description,
                ..Default::default()
            }
        }))
    }
}
