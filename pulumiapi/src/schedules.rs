use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::ApiError;
use crate::stacks::StackIdentifier;

// Timestamps on this API are RFC 3339 strings; they pass through untouched.

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOperationContextOptions {
    #[serde(
        rename = "remediateIfDriftDetected",
        skip_serializing_if = "std::ops::Not::not",
        default
    )]
    pub auto_remediate: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub delete_after_destroy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOperationContext {
    #[serde(default)]
    pub options: ScheduleOperationContextOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRequest {
    #[serde(rename = "operation", skip_serializing_if = "String::is_empty", default)]
    pub pulumi_operation: String,
    #[serde(default)]
    pub operation_context: ScheduleOperationContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentScheduleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_cron: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_once: Option<String>,
    pub request: DeploymentRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriftScheduleRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub schedule_cron: String,
    pub auto_remediate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTtlScheduleRequest {
    pub timestamp: String,
    pub delete_after_destroy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleDefinition {
    pub request: DeploymentRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleResponse {
    pub id: String,
    pub schedule_once: Option<String>,
    pub schedule_cron: Option<String>,
    pub definition: ScheduleDefinition,
}

fn schedules_path(stack: &StackIdentifier) -> String {
    format!("{}/deployments/schedules", stack.path())
}

impl Client {
    pub async fn create_deployment_schedule(
        &self,
        stack: &StackIdentifier,
        req: &CreateDeploymentScheduleRequest,
    ) -> Result<String, ApiError> {
        let res: ScheduleResponse = self.post_json(&schedules_path(stack), req).await?;
        Ok(res.id)
    }

    pub async fn create_drift_schedule(
        &self,
        stack: &StackIdentifier,
        req: &CreateDriftScheduleRequest,
    ) -> Result<String, ApiError> {
        let res: ScheduleResponse = self
            .post_json(&format!("{}/deployments/drift/schedules", stack.path()), req)
            .await?;
        Ok(res.id)
    }

    pub async fn create_ttl_schedule(
        &self,
        stack: &StackIdentifier,
        req: &CreateTtlScheduleRequest,
    ) -> Result<String, ApiError> {
        let res: ScheduleResponse = self
            .post_json(&format!("{}/deployments/ttl/schedules", stack.path()), req)
            .await?;
        Ok(res.id)
    }

    pub async fn get_schedule(
        &self,
        stack: &StackIdentifier,
        schedule_id: &str,
    ) -> Result<Option<ScheduleResponse>, ApiError> {
        match self
            .get_json(&format!("{}/{schedule_id}", schedules_path(stack)))
            .await
        {
            Ok(res) => Ok(Some(res)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    // Updates are POSTs to the schedule id; the service replaces the
    // definition wholesale.
    pub async fn update_deployment_schedule(
        &self,
        stack: &StackIdentifier,
        req: &CreateDeploymentScheduleRequest,
        schedule_id: &str,
    ) -> Result<String, ApiError> {
        let res: ScheduleResponse = self
            .post_json(&format!("{}/{schedule_id}", schedules_path(stack)), req)
            .await?;
        Ok(res.id)
    }

    pub async fn update_drift_schedule(
        &self,
        stack: &StackIdentifier,
        req: &CreateDriftScheduleRequest,
        schedule_id: &str,
    ) -> Result<String, ApiError> {
        let res: ScheduleResponse = self
            .post_json(
                &format!("{}/deployments/drift/schedules/{schedule_id}", stack.path()),
                req,
            )
            .await?;
        Ok(res.id)
    }

    pub async fn update_ttl_schedule(
        &self,
        stack: &StackIdentifier,
        req: &CreateTtlScheduleRequest,
        schedule_id: &str,
    ) -> Result<String, ApiError> {
        let res: ScheduleResponse = self
            .post_json(
                &format!("{}/deployments/ttl/schedules/{schedule_id}", stack.path()),
                req,
            )
            .await?;
        Ok(res.id)
    }

    pub async fn delete_schedule(
        &self,
        stack: &StackIdentifier,
        schedule_id: &str,
    ) -> Result<(), ApiError> {
        self.delete_no_content(&format!("{}/{schedule_id}", schedules_path(stack)))
            .await
    }
}
