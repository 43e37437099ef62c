use serde_json::json;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::models::tool::Tool;

/// Every tool the product system exposes to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ProductTool {
    CalculateRiceScore,
    CreateUserStory,
    AnalyzeProductMetrics,
    GetRoadmap,
    CheckTeamCapacity,
}

/// Metric keys the analytics lookup knows about
pub const METRIC_TYPES: [&str; 6] = ["dau", "wau", "mau", "retention", "nps", "conversion"];

impl ProductTool {
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// The declarative contract the model sees for this tool
    pub fn definition(self) -> Tool {
        match self {
            ProductTool::CalculateRiceScore => Tool::new(
                self.name(),
                "Calculate RICE score (Reach × Impact × Confidence / Effort) for feature prioritization",
                json!({
                    "type": "object",
                    "properties": {
                        "feature_name": {
                            "type": "string",
                            "description": "Name of the feature being evaluated"
                        },
                        "reach": {
                            "type": "number",
                            "description": "Number of users/customers affected per time period"
                        },
                        "impact": {
                            "type": "number",
                            "description": "Impact score: 0.25=minimal, 0.5=low, 1=medium, 2=high, 3=massive"
                        },
                        "confidence": {
                            "type": "number",
                            "description": "Confidence percentage (e.g., 80 for 80%)"
                        },
                        "effort": {
                            "type": "number",
                            "description": "Effort in person-months"
                        }
                    },
                    "required": ["feature_name", "reach", "impact", "confidence", "effort"]
                }),
            ),
            ProductTool::CreateUserStory => Tool::new(
                self.name(),
                "Generate a well-formatted user story with acceptance criteria",
                json!({
                    "type": "object",
                    "properties": {
                        "user_type": {
                            "type": "string",
                            "description": "Type of user (e.g., 'customer', 'admin', 'developer')"
                        },
                        "goal": {
                            "type": "string",
                            "description": "What the user wants to accomplish"
                        },
                        "benefit": {
                            "type": "string",
                            "description": "Why the user wants this (the value/benefit)"
                        },
                        "acceptance_criteria": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "List of acceptance criteria (optional)"
                        }
                    },
                    "required": ["user_type", "goal", "benefit"]
                }),
            ),
            ProductTool::AnalyzeProductMetrics => Tool::new(
                self.name(),
                "Get simulated product metrics (in real implementation, would connect to analytics)",
                json!({
                    "type": "object",
                    "properties": {
                        "metric_type": {
                            "type": "string",
                            "enum": METRIC_TYPES,
                            "description": "Type of metric to retrieve"
                        },
                        "time_period": {
                            "type": "string",
                            "description": "Time period (e.g., 'last_week', 'last_month', 'last_quarter')"
                        }
                    },
                    "required": ["metric_type", "time_period"]
                }),
            ),
            ProductTool::GetRoadmap => Tool::new(
                self.name(),
                "Retrieve current product roadmap (simulated data)",
                json!({
                    "type": "object",
                    "properties": {
                        "quarter": {
                            "type": "string",
                            "description": "Which quarter to view (e.g., 'current', 'next', 'Q1_2024')"
                        }
                    },
                    "required": ["quarter"]
                }),
            ),
            ProductTool::CheckTeamCapacity => Tool::new(
                self.name(),
                "Check engineering team capacity (simulated data)",
                json!({
                    "type": "object",
                    "properties": {
                        "team": {
                            "type": "string",
                            "description": "Team name (e.g., 'backend', 'frontend', 'mobile')"
                        },
                        "time_period": {
                            "type": "string",
                            "description": "Time period (e.g., 'next_sprint', 'next_month')"
                        }
                    },
                    "required": ["team", "time_period"]
                }),
            ),
        }
    }
}

/// The full tool catalog, in declaration order
pub fn catalog() -> Vec<Tool> {
    ProductTool::iter().map(ProductTool::definition).collect()
}
