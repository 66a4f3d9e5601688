use serde::Serialize;

use crate::client::Client;
use crate::error::ApiError;
use crate::stacks::{StackDetail, StackIdentifier};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackTag {
    pub name: String,
    pub value: String,
}

impl Client {
    pub async fn create_tag(
        &self,
        stack: &StackIdentifier,
        tag: &StackTag,
    ) -> Result<(), ApiError> {
        self.post_no_content(&format!("{}/tags", stack.path()), tag)
            .await
    }

    pub async fn delete_tag(
        &self,
        stack: &StackIdentifier,
        tag_name: &str,
    ) -> Result<(), ApiError> {
        self.delete_no_content(&format!("{}/tags/{tag_name}", stack.path()))
            .await
    }

    /// Read a single tag off the stack. `None` when the stack has no such tag
    /// or the stack itself is gone.
    pub async fn get_stack_tag(
        &self,
        stack: &StackIdentifier,
        tag_name: &str,
    ) -> Result<Option<StackTag>, ApiError> {
        let detail = match self.get_json::<StackDetail>(&stack.path()).await {
            Ok(detail) => detail,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(detail.tags.get(tag_name).map(|value| StackTag {
            name: tag_name.to_string(),
            value: value.clone(),
        }))
    }
}
