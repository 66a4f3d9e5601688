use serde::{Deserialize, Serialize};

use crate::client::{require, Client};
use crate::error::ApiError;

/// A self-hosted deployment agent pool. `token_value` is only returned on
/// create.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentPool {
    pub id: String,
    pub name: String,
    pub description: String,
    pub token_value: String,
}

#[derive(Debug, Serialize)]
struct AgentPoolRequest<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAgentPoolResponse {
    id: String,
    token_value: String,
}

impl Client {
    pub async fn create_agent_pool(
        &self,
        org_name: &str,
        name: &str,
        description: &str,
    ) -> Result<AgentPool, ApiError> {
        require(org_name, "orgName")?;
        require(name, "name")?;
        let res: CreateAgentPoolResponse = self
            .post_json(
                &format!("orgs/{org_name}/agent-pools"),
                &AgentPoolRequest { name, description },
            )
            .await?;
        Ok(AgentPool {
            id: res.id,
            name: name.to_string(),
            description: description.to_string(),
            token_value: res.token_value,
        })
    }

    pub async fn update_agent_pool(
        &self,
        agent_pool_id: &str,
        org_name: &str,
        name: &str,
        description: &str,
    ) -> Result<(), ApiError> {
        require(agent_pool_id, "agentPoolId")?;
        require(org_name, "orgName")?;
        require(name, "name")?;
        self.patch_no_content(
            &format!("orgs/{org_name}/agent-pools/{agent_pool_id}"),
            &AgentPoolRequest { name, description },
        )
        .await
    }

    pub async fn delete_agent_pool(
        &self,
        agent_pool_id: &str,
        org_name: &str,
        force_destroy: bool,
    ) -> Result<(), ApiError> {
        require(agent_pool_id, "agentPoolId")?;
        require(org_name, "orgName")?;
        let path = format!("orgs/{org_name}/agent-pools/{agent_pool_id}");
        if force_destroy {
            self.delete_no_content_query(&path, &[("force", "true".to_string())])
                .await
        } else {
            self.delete_no_content(&path).await
        }
    }

    pub async fn get_agent_pool(
        &self,
        agent_pool_id: &str,
        org_name: &str,
    ) -> Result<Option<AgentPool>, ApiError> {
        match self
            .get_json(&format!("orgs/{org_name}/agent-pools/{agent_pool_id}"))
            .await
        {
            Ok(pool) => Ok(Some(pool)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
