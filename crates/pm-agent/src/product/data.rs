use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A single planned or in-flight roadmap item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapFeature {
    pub name: String,
    pub status: String,
    pub priority: String,
    pub owner: String,
}

impl RoadmapFeature {
    fn new(name: &str, status: &str, priority: &str, owner: &str) -> Self {
        Self {
            name: name.to_string(),
            status: status.to_string(),
            priority: priority.to_string(),
            owner: owner.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    pub quarter: String,
    pub features: Vec<RoadmapFeature>,
}

/// Story-point capacity of one team for a planning period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamCapacity {
    pub total_points: u32,
    pub committed: u32,
    pub available: u32,
    pub engineers: u32,
}

impl TeamCapacity {
    /// Committed share of total points, as a percentage
    pub fn utilization(&self) -> f64 {
        if self.total_points == 0 {
            return 100.0;
        }
        f64::from(self.committed) / f64::from(self.total_points) * 100.0
    }
}

/// Backing store for the lookup tools. Swap this out to connect real analytics,
/// planning or staffing systems without touching the agent.
pub trait ProductData: Send + Sync {
    /// Metric payload for a metric key, `None` if the key is unknown
    fn metric(&self, metric_type: &str) -> Option<Value>;

    /// Roadmap for a quarter key, `None` if the quarter is unknown
    fn roadmap(&self, quarter: &str) -> Option<Roadmap>;

    /// Capacity for a lower-cased team key, `None` if the team is unknown
    fn capacity(&self, team: &str) -> Option<TeamCapacity>;

    /// Known team keys, in display order
    fn teams(&self) -> Vec<String>;
}

/// Static sample data for demos and tests
#[derive(Debug, Clone, Default)]
pub struct SimulatedProductData;

impl ProductData for SimulatedProductData {
    fn metric(&self, metric_type: &str) -> Option<Value> {
        let data = match metric_type {
            "dau" => json!({"current": 15420, "previous": 14850, "change": "+3.8%"}),
            "wau" => json!({"current": 45200, "previous": 43100, "change": "+4.9%"}),
            "mau" => json!({"current": 125000, "previous": 118000, "change": "+5.9%"}),
            "retention" => json!({"day_1": "72%", "day_7": "45%", "day_30": "28%"}),
            "nps" => json!({"score": 42, "promoters": "45%", "detractors": "15%"}),
            "conversion" => json!({"rate": "3.2%", "funnel": {"visitors": 10000, "signups": 320}}),
            _ => return None,
        };
        Some(data)
    }

    fn roadmap(&self, quarter: &str) -> Option<Roadmap> {
        match quarter {
            "current" => Some(Roadmap {
                quarter: "Q4 2024".to_string(),
                features: vec![
                    RoadmapFeature::new("User authentication v2", "in_progress", "P0", "Backend team"),
                    RoadmapFeature::new("Mobile app redesign", "planning", "P1", "Mobile team"),
                    RoadmapFeature::new("Analytics dashboard", "completed", "P0", "Frontend team"),
                ],
            }),
            "next" => Some(Roadmap {
                quarter: "Q1 2025".to_string(),
                features: vec![
                    RoadmapFeature::new("AI-powered recommendations", "planned", "P1", "ML team"),
                    RoadmapFeature::new("Team collaboration features", "planned", "P0", "Backend team"),
                    RoadmapFeature::new("Advanced reporting", "planned", "P2", "Frontend team"),
                ],
            }),
            _ => None,
        }
    }

    fn capacity(&self, team: &str) -> Option<TeamCapacity> {
        let (total_points, committed, available, engineers) = match team {
            "backend" => (50, 38, 12, 5),
            "frontend" => (40, 35, 5, 4),
            "mobile" => (30, 25, 5, 3),
            _ => return None,
        };
        Some(TeamCapacity {
            total_points,
            committed,
            available,
            engineers,
        })
    }

    fn teams(&self) -> Vec<String> {
        vec!["backend".into(), "frontend".into(), "mobile".into()]
    }
}
