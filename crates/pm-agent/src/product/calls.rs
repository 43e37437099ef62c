use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

use super::catalog::ProductTool;
use crate::errors::{AgentError, AgentResult};
use crate::models::tool::ToolCall;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RiceInput {
    pub feature_name: String,
    pub reach: f64,
    pub impact: f64,
    pub confidence: f64,
    pub effort: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserStoryInput {
    pub user_type: String,
    pub goal: String,
    pub benefit: String,
    #[serde(default)]
    pub acceptance_criteria: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricsInput {
    pub metric_type: String,
    pub time_period: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoadmapInput {
    pub quarter: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CapacityInput {
    pub team: String,
    pub time_period: String,
}

/// A tool invocation whose arguments have already been checked against the tool's schema
#[derive(Debug, Clone, PartialEq)]
pub enum ProductCall {
    CalculateRiceScore(RiceInput),
    CreateUserStory(UserStoryInput),
    AnalyzeProductMetrics(MetricsInput),
    GetRoadmap(RoadmapInput),
    CheckTeamCapacity(CapacityInput),
}

impl ProductCall {
    /// Resolve the tool by name and decode its arguments
    pub fn parse(call: &ToolCall) -> AgentResult<Self> {
        let tool = ProductTool::from_str(&call.name)
            .map_err(|_| AgentError::ToolNotFound(call.name.clone()))?;
        Self::from_tool(tool, call.arguments.clone())
    }

    pub fn from_tool(tool: ProductTool, arguments: Value) -> AgentResult<Self> {
        Ok(match tool {
            ProductTool::CalculateRiceScore => {
                ProductCall::CalculateRiceScore(decode(tool, arguments)?)
            }
            ProductTool::CreateUserStory => ProductCall::CreateUserStory(decode(tool, arguments)?),
            ProductTool::AnalyzeProductMetrics => {
                ProductCall::AnalyzeProductMetrics(decode(tool, arguments)?)
            }
            ProductTool::GetRoadmap => ProductCall::GetRoadmap(decode(tool, arguments)?),
            ProductTool::CheckTeamCapacity => {
                ProductCall::CheckTeamCapacity(decode(tool, arguments)?)
            }
        })
    }

    pub fn tool(&self) -> ProductTool {
        match self {
            ProductCall::CalculateRiceScore(_) => ProductTool::CalculateRiceScore,
            ProductCall::CreateUserStory(_) => ProductTool::CreateUserStory,
            ProductCall::AnalyzeProductMetrics(_) => ProductTool::AnalyzeProductMetrics,
            ProductCall::GetRoadmap(_) => ProductTool::GetRoadmap,
            ProductCall::CheckTeamCapacity(_) => ProductTool::CheckTeamCapacity,
        }
    }
}

fn decode<T: DeserializeOwned>(tool: ProductTool, arguments: Value) -> AgentResult<T> {
    serde_json::from_value(arguments)
        .map_err(|e| AgentError::InvalidParameters(format!("{}: {}", tool, e)))
}
