use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::CostConfig;

/// Price and latency per synthesized image, for pre-flight planning only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    pub cost_per_image: f64,
    pub seconds_per_image: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            cost_per_image: 0.08,
            seconds_per_image: 15.0,
        }
    }
}

impl From<&CostConfig> for CostModel {
    fn from(config: &CostConfig) -> Self {
        Self {
            cost_per_image: config.cost_per_image,
            seconds_per_image: config.seconds_per_image,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub template_count: usize,
    pub unit_cost: f64,
    #[serde(with = "duration_secs")]
    pub estimated_wall_clock: Duration,
    pub total_cost: f64,
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs.max(0.0)))
    }
}

/// Not authoritative: actual spend depends on retries and the provider's pricing.
pub fn estimate_cost(template_count: usize, model: &CostModel) -> CostEstimate {
    let count = template_count as f64;
    CostEstimate {
        template_count,
        unit_cost: model.cost_per_image,
        estimated_wall_clock: Duration::from_secs_f64((count * model.seconds_per_image).max(0.0)),
        total_cost: count * model.cost_per_image,
    }
}
