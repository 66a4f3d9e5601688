//! Teams, team membership, and team-scoped stack/environment permissions.

use serde::{Deserialize, Serialize};

use crate::client::{require, Client};
use crate::common::PulumiDuration;
use crate::error::ApiError;
use crate::stacks::StackIdentifier;

const TEAM_TYPES: [&str; 2] = ["github", "pulumi"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Team {
    #[serde(rename = "kind")]
    pub team_type: String,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub members: Vec<TeamMember>,
    pub stacks: Vec<TeamStackPermission>,
    pub environments: Vec<TeamEnvironmentSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMember {
    pub name: String,
    pub github_login: String,
    pub avatar_url: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamStackPermission {
    pub project_name: String,
    pub stack_name: String,
    pub permission: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamEnvironmentSettings {
    pub env_name: String,
    pub project_name: String,
    pub permission: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_open_duration: Option<PulumiDuration>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListTeamsResponse {
    teams: Vec<Team>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTeamRequest<'a> {
    organization: &'a str,
    team_type: &'a str,
    name: &'a str,
    display_name: &'a str,
    description: &'a str,
    #[serde(rename = "githubTeamID", skip_serializing_if = "is_zero")]
    github_team_id: i64,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTeamRequest<'a> {
    new_display_name: &'a str,
    new_description: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTeamMembershipRequest<'a> {
    member_action: &'a str,
    member: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddStackPermissionRequest<'a> {
    add_stack_permission: StackPermissionBody<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StackPermissionBody<'a> {
    project_name: &'a str,
    stack_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    permission: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveStackPermissionRequest<'a> {
    remove_stack: StackPermissionBody<'a>,
}

/// Identifies a team-scoped environment permission.
#[derive(Debug, Clone, Default)]
pub struct TeamEnvironmentSettingsRequest {
    pub organization: String,
    pub team: String,
    pub environment: String,
    pub project: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddEnvironmentSettingsRequest<'a> {
    add_environment_permission: EnvironmentPermissionBody<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvironmentPermissionBody<'a> {
    env_name: &'a str,
    project_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    permission: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_open_duration: Option<PulumiDuration>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveEnvironmentSettingsRequest<'a> {
    remove_environment: EnvironmentPermissionBody<'a>,
}

impl Client {
    pub async fn list_teams(&self, org_name: &str) -> Result<Vec<Team>, ApiError> {
        require(org_name, "orgName")?;
        let res: ListTeamsResponse = self.get_json(&format!("orgs/{org_name}/teams")).await?;
        Ok(res.teams)
    }

    pub async fn get_team(&self, org_name: &str, team_name: &str) -> Result<Option<Team>, ApiError> {
        require(org_name, "orgName")?;
        require(team_name, "teamName")?;
        match self
            .get_json(&format!("orgs/{org_name}/teams/{team_name}"))
            .await
        {
            Ok(team) => Ok(Some(team)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn create_team(
        &self,
        org_name: &str,
        team_name: &str,
        team_type: &str,
        display_name: &str,
        description: &str,
        github_team_id: i64,
    ) -> Result<Team, ApiError> {
        if !TEAM_TYPES.contains(&team_type) {
            return Err(ApiError::Validation(format!(
                "teamType must be one of {TEAM_TYPES:?}, got {team_type:?}"
            )));
        }
        require(org_name, "orgName")?;
        if team_name.is_empty() && team_type != "github" {
            return Err(ApiError::Validation("empty teamName".to_string()));
        }
        if team_type == "github" && github_team_id == 0 {
            return Err(ApiError::Validation(
                "github teams require a githubTeamId".to_string(),
            ));
        }

        let req = CreateTeamRequest {
            organization: org_name,
            team_type,
            name: team_name,
            display_name,
            description,
            github_team_id,
        };
        self.post_json(&format!("orgs/{org_name}/teams/{team_type}"), &req)
            .await
    }

    pub async fn update_team(
        &self,
        org_name: &str,
        team_name: &str,
        display_name: &str,
        description: &str,
    ) -> Result<(), ApiError> {
        require(org_name, "orgName")?;
        require(team_name, "teamName")?;
        let req = UpdateTeamRequest {
            new_display_name: display_name,
            new_description: description,
        };
        self.patch_no_content(&format!("orgs/{org_name}/teams/{team_name}"), &req)
            .await
    }

    pub async fn delete_team(&self, org_name: &str, team_name: &str) -> Result<(), ApiError> {
        require(org_name, "orgName")?;
        require(team_name, "teamName")?;
        self.delete_no_content(&format!("orgs/{org_name}/teams/{team_name}"))
            .await
    }

    async fn update_team_membership(
        &self,
        org_name: &str,
        team_name: &str,
        user_name: &str,
        action: &str,
    ) -> Result<(), ApiError> {
        require(org_name, "orgName")?;
        require(team_name, "teamName")?;
        require(user_name, "userName")?;
        let req = UpdateTeamMembershipRequest {
            member_action: action,
            member: user_name,
        };
        self.patch_no_content(&format!("orgs/{org_name}/teams/{team_name}"), &req)
            .await
    }

    pub async fn add_member_to_team(
        &self,
        org_name: &str,
        team_name: &str,
        user_name: &str,
    ) -> Result<(), ApiError> {
        match self
            .update_team_membership(org_name, team_name, user_name, "add")
            .await
        {
            // 409 means the member is already on the team.
            Err(e) if e.status_code() == Some(409) => Ok(()),
            other => other,
        }
    }

    pub async fn delete_member_from_team(
        &self,
        org_name: &str,
        team_name: &str,
        user_name: &str,
    ) -> Result<(), ApiError> {
        self.update_team_membership(org_name, team_name, user_name, "remove")
            .await
    }

    pub async fn add_stack_permission(
        &self,
        stack: &StackIdentifier,
        team_name: &str,
        permission: i64,
    ) -> Result<(), ApiError> {
        require(&stack.org_name, "orgName")?;
        require(team_name, "teamName")?;
        let req = AddStackPermissionRequest {
            add_stack_permission: StackPermissionBody {
                project_name: &stack.project_name,
                stack_name: &stack.stack_name,
                permission: Some(permission),
            },
        };
        self.patch_no_content(&format!("orgs/{}/teams/{team_name}", stack.org_name), &req)
            .await
    }

    pub async fn remove_stack_permission(
        &self,
        stack: &StackIdentifier,
        team_name: &str,
    ) -> Result<(), ApiError> {
        require(&stack.org_name, "orgName")?;
        require(team_name, "teamName")?;
        let req = RemoveStackPermissionRequest {
            remove_stack: StackPermissionBody {
                project_name: &stack.project_name,
                stack_name: &stack.stack_name,
                permission: None,
            },
        };
        self.patch_no_content(&format!("orgs/{}/teams/{team_name}", stack.org_name), &req)
            .await
    }

    pub async fn get_team_stack_permission(
        &self,
        stack: &StackIdentifier,
        team_name: &str,
    ) -> Result<Option<i64>, ApiError> {
        require(&stack.org_name, "orgName")?;
        require(team_name, "teamName")?;
        let team: Team = self
            .get_json(&format!("orgs/{}/teams/{team_name}", stack.org_name))
            .await?;
        Ok(team
            .stacks
            .iter()
            .find(|p| p.project_name == stack.project_name && p.stack_name == stack.stack_name)
            .map(|p| p.permission))
    }

    pub async fn add_environment_settings(
        &self,
        req: &TeamEnvironmentSettingsRequest,
        permission: &str,
        max_open_duration: Option<PulumiDuration>,
    ) -> Result<(), ApiError> {
        require(&req.organization, "organization")?;
        require(&req.team, "team")?;
        require(&req.environment, "environment")?;
        let body = AddEnvironmentSettingsRequest {
            add_environment_permission: EnvironmentPermissionBody {
                env_name: &req.environment,
                project_name: &req.project,
                permission: Some(permission),
                max_open_duration,
            },
        };
        self.patch_no_content(
            &format!("orgs/{}/teams/{}", req.organization, req.team),
            &body,
        )
        .await
    }

    pub async fn remove_environment_settings(
        &self,
        req: &TeamEnvironmentSettingsRequest,
    ) -> Result<(), ApiError> {
        require(&req.organization, "organization")?;
        require(&req.team, "team")?;
        require(&req.environment, "environment")?;
        let body = RemoveEnvironmentSettingsRequest {
            remove_environment: EnvironmentPermissionBody {
                env_name: &req.environment,
                project_name: &req.project,
                permission: None,
                max_open_duration: None,
            },
        };
        self.patch_no_content(
            &format!("orgs/{}/teams/{}", req.organization, req.team),
            &body,
        )
        .await
    }

    /// Permission and max-open duration for the team on one environment,
    /// or `None` if the team has no settings for it.
    pub async fn get_team_environment_settings(
        &self,
        req: &TeamEnvironmentSettingsRequest,
    ) -> Result<Option<(String, Option<PulumiDuration>)>, ApiError> {
        require(&req.organization, "organization")?;
        require(&req.team, "team")?;
        require(&req.environment, "environment")?;
        let team: Team = self
            .get_json(&format!("orgs/{}/teams/{}", req.organization, req.team))
            .await?;
        Ok(team
            .environments
            .into_iter()
            .find(|s| s.env_name == req.environment)
            .map(|s| (s.permission, s.max_open_duration)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::create_test_client;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn list_teams_unwraps_envelope() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/orgs/acme/teams")
            .with_body(
                r#"{"teams":[
                    {"kind":"pulumi","name":"team1","displayName":"Team 1",
                     "description":"first","members":[{"name":"alice"},{"name":"bob"}]}
                ]}"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let teams = client.list_teams("acme").await.unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].team_type, "pulumi");
        assert_eq!(teams[0].members.len(), 2);
    }

    #[tokio::test]
    async fn list_teams_surfaces_service_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/orgs/acme/teams")
            .with_status(401)
            .with_body(r#"{"code":401,"message":"unauthorized"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let err = client.list_teams("acme").await.unwrap_err();
        assert_eq!(err.to_string(), "401 API error: unauthorized");
    }

    #[tokio::test]
    async fn get_team_returns_none_on_404() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/orgs/acme/teams/missing")
            .with_status(404)
            .with_body(r#"{"code":404,"message":"team not found"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let team = client.get_team("acme", "missing").await.unwrap();
        assert!(team.is_none());
    }

    #[tokio::test]
    async fn create_team_rejects_unknown_type() {
        let client = create_test_client("http://localhost:1");
        let err = client
            .create_team("acme", "t", "gitlab", "", "", 0)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("teamType"));
    }

    #[tokio::test]
    async fn create_team_requires_github_team_id_for_github_teams() {
        let client = create_test_client("http://localhost:1");
        let err = client
            .create_team("acme", "", "github", "", "", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn create_team_posts_to_type_scoped_path() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/orgs/acme/teams/pulumi")
            .match_body(Matcher::Json(serde_json::json!({
                "organization": "acme",
                "teamType": "pulumi",
                "name": "platform",
                "displayName": "Platform",
                "description": "platform team"
            })))
            .with_body(r#"{"kind":"pulumi","name":"platform","displayName":"Platform","description":"platform team"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let team = client
            .create_team("acme", "platform", "pulumi", "Platform", "platform team", 0)
            .await
            .unwrap();
        assert_eq!(team.name, "platform");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn add_member_ignores_conflict() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("PATCH", "/api/orgs/acme/teams/platform")
            .with_status(409)
            .with_body(r#"{"code":409,"message":"already a member"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        client
            .add_member_to_team("acme", "platform", "alice")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn get_team_stack_permission_finds_matching_stack() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/orgs/acme/teams/platform")
            .with_body(
                r#"{"kind":"pulumi","name":"platform","stacks":[
                    {"projectName":"proj","stackName":"dev","permission":101},
                    {"projectName":"proj","stackName":"prod","permission":103}
                ]}"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let stack = StackIdentifier {
            org_name: "acme".to_string(),
            project_name: "proj".to_string(),
            stack_name: "prod".to_string(),
        };
        let permission = client
            .get_team_stack_permission(&stack, "platform")
            .await
            .unwrap();
        assert_eq!(permission, Some(103));
    }

    #[tokio::test]
    async fn environment_settings_round_trip() {
        let mut server = Server::new_async().await;
        let patch = server
            .mock("PATCH", "/api/orgs/acme/teams/platform")
            .match_body(Matcher::Json(serde_json::json!({
                "addEnvironmentPermission": {
                    "envName": "dev-env",
                    "projectName": "proj",
                    "permission": "open",
                    "maxOpenDuration": "1h0m0s"
                }
            })))
            .with_status(204)
            .create_async()
            .await;
        let get = server
            .mock("GET", "/api/orgs/acme/teams/platform")
            .with_body(
                r#"{"kind":"pulumi","name":"platform","environments":[
                    {"envName":"dev-env","projectName":"proj","permission":"open","maxOpenDuration":"1h0m0s"}
                ]}"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let req = TeamEnvironmentSettingsRequest {
            organization: "acme".to_string(),
            team: "platform".to_string(),
            environment: "dev-env".to_string(),
            project: "proj".to_string(),
        };
        client
            .add_environment_settings(&req, "open", Some(PulumiDuration::from_secs(3600)))
            .await
            .unwrap();
        let settings = client
            .get_team_environment_settings(&req)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(settings.0, "open");
        assert_eq!(settings.1, Some(PulumiDuration::from_secs(3600)));

        patch.assert_async().await;
        get.assert_async().await;
    }
}
