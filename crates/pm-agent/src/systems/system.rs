use async_trait::async_trait;

use crate::errors::AgentResult;
use crate::models::content::Content;
use crate::models::tool::{Tool, ToolCall};

/// A bundle of tools the agent can offer to the model, plus the prompt text that
/// explains them
#[async_trait]
pub trait System: Send + Sync {
    fn name(&self) -> &str;

    /// One line shown in the system prompt
    fn description(&self) -> &str;

    /// Usage guidance appended to the system prompt
    fn instructions(&self) -> &str;

    fn tools(&self) -> &[Tool];

    fn has_tool(&self, name: &str) -> bool {
        self.tools().iter().any(|tool| tool.name == name)
    }

    /// Run one tool. Errors are reported back to the model, not to the user.
    async fn call(&self, tool_call: ToolCall) -> AgentResult<Vec<Content>>;
}
