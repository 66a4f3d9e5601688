use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::ApiError;
use crate::user::UserInfo;

/// Fully-qualified stack name: `org/project/stack`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StackIdentifier {
    pub org_name: String,
    pub project_name: String,
    pub stack_name: String,
}

impl fmt::Display for StackIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.org_name, self.project_name, self.stack_name
        )
    }
}

impl FromStr for StackIdentifier {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [org, project, stack] if !org.is_empty() && !project.is_empty() && !stack.is_empty() => {
                Ok(StackIdentifier {
                    org_name: org.to_string(),
                    project_name: project.to_string(),
                    stack_name: stack.to_string(),
                })
            }
            _ => Err(ApiError::Validation(format!("invalid stack id: {s}"))),
        }
    }
}

impl StackIdentifier {
    fn validate(&self) -> Result<(), ApiError> {
        if self.org_name.is_empty() || self.project_name.is_empty() || self.stack_name.is_empty() {
            return Err(ApiError::Validation(format!(
                "invalid stack identifier: {self}"
            )));
        }
        Ok(())
    }

    pub(crate) fn path(&self) -> String {
        format!(
            "stacks/{}/{}/{}",
            self.org_name, self.project_name, self.stack_name
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateStackRequest<'a> {
    stack_name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStackSummary {
    pub id: String,
    pub org_name: String,
    pub project_name: String,
    pub stack_name: String,
    pub last_update: Option<i64>,
    pub resource_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStacksResponse {
    pub stacks: Vec<AppStackSummary>,
    pub continuation_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StackTeam {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub permission: i64,
    pub is_member: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTeamsByStackResponse {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub teams: Vec<StackTeam>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPermission {
    pub user: UserInfo,
    pub permission: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStackCollaboratorsResponse {
    #[serde(default)]
    pub users: Vec<UserPermission>,
    #[serde(default)]
    pub user_stack_permission: i64,
    pub stack_creator_user_name: Option<String>,
}

// Only the tag map is read from the stack endpoint; everything else about
// the stack is managed through the CLI, not this provider.
#[derive(Debug, Deserialize, Default)]
pub(crate) struct StackDetail {
    #[serde(default)]
    pub(crate) tags: std::collections::HashMap<String, String>,
}

impl Client {
    pub async fn create_stack(&self, stack: &StackIdentifier) -> Result<(), ApiError> {
        let req = CreateStackRequest {
            stack_name: &stack.stack_name,
        };
        self.post_no_content(
            &format!("stacks/{}/{}", stack.org_name, stack.project_name),
            &req,
        )
        .await
    }

    pub async fn stack_exists(&self, stack: &StackIdentifier) -> Result<bool, ApiError> {
        stack.validate()?;
        match self.get_json::<StackDetail>(&stack.path()).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn delete_stack(
        &self,
        stack: &StackIdentifier,
        force_destroy: bool,
    ) -> Result<(), ApiError> {
        if force_destroy {
            self.delete_no_content_query(
                &stack.path(),
                &[("forceDestroy", "true".to_string())],
            )
            .await
        } else {
            self.delete_no_content(&stack.path()).await
        }
    }

    pub async fn list_user_stacks(
        &self,
        max_results: Option<i64>,
    ) -> Result<ListStacksResponse, ApiError> {
        match max_results {
            Some(n) if n > 0 => {
                self.get_json_query("user/stacks", &[("maxResults", n.to_string())])
                    .await
            }
            _ => self.get_json("user/stacks").await,
        }
    }

    pub async fn list_stack_team_permissions(
        &self,
        stack: &StackIdentifier,
    ) -> Result<ListTeamsByStackResponse, ApiError> {
        stack.validate()?;
        self.get_json(&format!("{}/teams", stack.path())).await
    }

    pub async fn list_stack_collaborators(
        &self,
        stack: &StackIdentifier,
    ) -> Result<ListStackCollaboratorsResponse, ApiError> {
        stack.validate()?;
        self.get_json(&format!("{}/collaborators", stack.path()))
            .await
    }
}
