use serde::{Deserialize, Serialize};

use crate::client::{require, Client};
use crate::error::ApiError;

/// Where a webhook hangs off the service API. Stack and environment hooks
/// live under their owner's path, everything else is org-scoped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookScope {
    Organization,
    Stack {
        project_name: String,
        stack_name: String,
    },
    Environment {
        project_name: String,
        environment_name: String,
    },
}

impl WebhookScope {
    fn api_path(&self, org_name: &str) -> String {
        match self {
            WebhookScope::Organization => format!("orgs/{org_name}/hooks"),
            WebhookScope::Stack {
                project_name,
                stack_name,
            } => format!("stacks/{org_name}/{project_name}/{stack_name}/hooks"),
            WebhookScope::Environment {
                project_name,
                environment_name,
            } => format!("esc/environments/{org_name}/{project_name}/{environment_name}/hooks"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Webhook {
    pub name: String,
    pub display_name: String,
    pub payload_url: String,
    pub active: bool,
    pub format: String,
    pub filters: Vec<String>,
    pub groups: Vec<String>,
    pub has_secret: bool,
    pub secret_ciphertext: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WebhookRequest {
    pub organization_name: String,
    pub scope: Option<WebhookScope>,
    pub display_name: String,
    pub payload_url: String,
    pub secret: Option<String>,
    pub active: bool,
    pub format: Option<String>,
    pub filters: Vec<String>,
    pub groups: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookBody<'a> {
    organization_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack_name: Option<&'a str>,
    #[serde(rename = "envName", skip_serializing_if = "Option::is_none")]
    environment_name: Option<&'a str>,
    display_name: &'a str,
    payload_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret: Option<&'a str>,
    active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    filters: &'a [String],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    groups: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

impl WebhookRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require(&self.organization_name, "organizationName")?;
        require(&self.display_name, "displayName")?;
        require(&self.payload_url, "payloadUrl")?;
        Ok(())
    }

    fn scope(&self) -> &WebhookScope {
        self.scope.as_ref().unwrap_or(&WebhookScope::Organization)
    }

    fn body<'a>(&'a self, name: Option<&'a str>) -> WebhookBody<'a> {
        let (project_name, stack_name, environment_name) = match self.scope() {
            WebhookScope::Organization => (None, None, None),
            WebhookScope::Stack {
                project_name,
                stack_name,
            } => (Some(project_name.as_str()), Some(stack_name.as_str()), None),
            WebhookScope::Environment {
                project_name,
                environment_name,
            } => (
                Some(project_name.as_str()),
                None,
                Some(environment_name.as_str()),
            ),
        };
        WebhookBody {
            organization_name: &self.organization_name,
            project_name,
            stack_name,
            environment_name,
            display_name: &self.display_name,
            payload_url: &self.payload_url,
            secret: self.secret.as_deref(),
            active: self.active,
            format: self.format.as_deref(),
            filters: &self.filters,
            groups: &self.groups,
            name,
        }
    }
}

impl Client {
    pub async fn create_webhook(&self, req: &WebhookRequest) -> Result<Webhook, ApiError> {
        req.validate()?;
        let path = req.scope().api_path(&req.organization_name);
        self.post_json(&path, &req.body(None)).await
    }

    pub async fn list_webhooks(
        &self,
        org_name: &str,
        scope: &WebhookScope,
    ) -> Result<Vec<Webhook>, ApiError> {
        require(org_name, "orgName")?;
        self.get_json(&scope.api_path(org_name)).await
    }

    pub async fn get_webhook(
        &self,
        org_name: &str,
        scope: &WebhookScope,
        webhook_name: &str,
    ) -> Result<Option<Webhook>, ApiError> {
        require(org_name, "orgName")?;
        require(webhook_name, "webhookName")?;
        match self
            .get_json(&format!("{}/{webhook_name}", scope.api_path(org_name)))
            .await
        {
            Ok(webhook) => Ok(Some(webhook)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn update_webhook(
        &self,
        name: &str,
        req: &WebhookRequest,
    ) -> Result<Webhook, ApiError> {
        require(name, "name")?;
        req.validate()?;
        let path = format!("{}/{name}", req.scope().api_path(&req.organization_name));
        self.patch_json(&path, &req.body(Some(name))).await
    }

    pub async fn delete_webhook(
        &self,
        org_name: &str,
        scope: &WebhookScope,
        name: &str,
    ) -> Result<(), ApiError> {
        require(org_name, "orgName")?;
        require(name, "name")?;
        self.delete_no_content(&format!("{}/{name}", scope.api_path(org_name)))
            .await
    }
}
