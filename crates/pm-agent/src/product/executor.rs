use serde_json::{json, Value};

use super::calls::{CapacityInput, MetricsInput, ProductCall, RoadmapInput};
use super::data::{ProductData, SimulatedProductData};
use super::{rice, story};
use crate::errors::{AgentError, AgentResult};
use crate::models::tool::ToolCall;

/// Utilization at or above this percentage means the team is full
pub const CAPACITY_THRESHOLD: f64 = 85.0;

/// Runs product tools against a data source. Pure apart from the data source lookups.
pub struct ProductExecutor {
    data: Box<dyn ProductData>,
}

impl Default for ProductExecutor {
    fn default() -> Self {
        Self::new(Box::new(SimulatedProductData))
    }
}

impl ProductExecutor {
    pub fn new(data: Box<dyn ProductData>) -> Self {
        Self { data }
    }

    /// Execute a tool by name. Unknown names produce an error payload, not an `Err`,
    /// so the model can read it like any other result.
    pub fn execute_tool(&self, name: &str, input: Value) -> AgentResult<Value> {
        match ProductCall::parse(&ToolCall::new(name, input)) {
            Ok(call) => self.execute(&call),
            Err(AgentError::ToolNotFound(_)) => {
                Ok(json!({"error": format!("Unknown tool: {}", name)}))
            }
            Err(e) => Err(e),
        }
    }

    pub fn execute(&self, call: &ProductCall) -> AgentResult<Value> {
        tracing::debug!(tool = %call.tool(), "executing product tool");
        match call {
            ProductCall::CalculateRiceScore(input) => rice::calculate(input),
            ProductCall::CreateUserStory(input) => Ok(story::create(input)),
            ProductCall::AnalyzeProductMetrics(input) => Ok(self.analyze_metrics(input)),
            ProductCall::GetRoadmap(input) => self.roadmap(input),
            ProductCall::CheckTeamCapacity(input) => self.team_capacity(input),
        }
    }

    fn analyze_metrics(&self, input: &MetricsInput) -> Value {
        let data = self
            .data
            .metric(&input.metric_type)
            .unwrap_or_else(|| json!({}));

        json!({
            "metric": input.metric_type.to_uppercase(),
            "time_period": input.time_period,
            "data": data,
            "note": "This is simulated data. Connect to your analytics platform for real metrics.",
        })
    }

    fn roadmap(&self, input: &RoadmapInput) -> AgentResult<Value> {
        match self.data.roadmap(&input.quarter) {
            Some(roadmap) => {
                serde_json::to_value(roadmap).map_err(|e| AgentError::Internal(e.to_string()))
            }
            None => Ok(json!({"error": "Quarter not found. Try 'current' or 'next'"})),
        }
    }

    fn team_capacity(&self, input: &CapacityInput) -> AgentResult<Value> {
        let Some(capacity) = self.data.capacity(&input.team.to_lowercase()) else {
            return Ok(json!({
                "error": format!(
                    "Team '{}' not found. Available teams: {}",
                    input.team,
                    self.data.teams().join(", ")
                )
            }));
        };

        let utilization = capacity.utilization();
        let recommendation = if utilization < CAPACITY_THRESHOLD {
            "Good capacity"
        } else {
            "Team is at capacity"
        };

        Ok(json!({
            "team": input.team,
            "time_period": input.time_period,
            "capacity": serde_json::to_value(capacity).map_err(|e| AgentError::Internal(e.to_string()))?,
            "utilization": format!("{:.1}%", utilization),
            "recommendation": recommendation,
        }))
    }
}
