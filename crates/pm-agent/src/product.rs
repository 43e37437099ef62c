pub mod calls;
pub mod catalog;
pub mod data;
pub mod executor;
pub mod rice;
pub mod story;

use async_trait::async_trait;
use indoc::formatdoc;

use crate::errors::AgentResult;
use crate::models::content::Content;
use crate::models::tool::{Tool, ToolCall};
use crate::systems::System;
use data::{ProductData, SimulatedProductData};
use executor::ProductExecutor;

/// Product-management tools: prioritization, user stories, metrics, roadmap and capacity
pub struct ProductSystem {
    tools: Vec<Tool>,
    instructions: String,
    executor: ProductExecutor,
}

impl Default for ProductSystem {
    fn default() -> Self {
        Self::new(Box::new(SimulatedProductData))
    }
}

impl ProductSystem {
    pub fn new(data: Box<dyn ProductData>) -> Self {
        let instructions = formatdoc! {"
            Use calculate_rice_score to compare features: confidence is a percentage (80 means 80%)
            and effort is in person-months, so effort must be greater than zero.
            Use create_user_story to draft stories in the standard \"As a ..., I want ... so that ...\" form.
            Roadmap quarters are 'current' or 'next'.
            Known engineering teams: {teams}.
            Lookup results that contain an \"error\" field mean the key was not found; explain that to the user.",
            teams = data.teams().join(", "),
        };

        Self {
            tools: catalog::catalog(),
            instructions,
            executor: ProductExecutor::new(data),
        }
    }
}

#[async_trait]
impl System for ProductSystem {
    fn name(&self) -> &str {
        "ProductSystem"
    }

    fn description(&self) -> &str {
        "Planning tools for feature prioritization, user stories, product metrics, roadmap and team capacity."
    }

    fn instructions(&self) -> &str {
        &self.instructions
    }

    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    async fn call(&self, tool_call: ToolCall) -> AgentResult<Vec<Content>> {
        let result = self.executor.execute_tool(&tool_call.name, tool_call.arguments)?;
        Ok(vec![Content::json(&result)])
    }
}
