use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::api::auth::models::{generate_id, PublicUser};
use crate::api::error::MarketError;

pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_LOCATION: &str = "Remoto";

/// Job status enum representing the state of a posting
///
/// Only `Abierto` is ever assigned; the others are kept so stored records
/// using them still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Abierto,
    EnProceso,
    Completado,
    Cancelado,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Abierto => "ABIERTO",
            JobStatus::EnProceso => "EN_PROCESO",
            JobStatus::Completado => "COMPLETADO",
            JobStatus::Cancelado => "CANCELADO",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ABIERTO" => Ok(JobStatus::Abierto),
            "EN_PROCESO" => Ok(JobStatus::EnProceso),
            "COMPLETADO" => Ok(JobStatus::Completado),
            "CANCELADO" => Ok(JobStatus::Cancelado),
            other => Err(MarketError::CorruptRecord(format!(
                "unknown job status {other}"
            ))),
        }
    }
}

/// A posted job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub budget: f64,
    pub location: String,
    pub status: JobStatus,
    pub published_at: DateTime<Utc>,
}

impl Job {
    /// Build an open job owned by `creator`, filling in defaults.
    pub fn new(data: NewJob, creator: &PublicUser) -> Self {
        Job {
            id: generate_id(),
            client_id: creator.id.clone(),
            client_name: creator.nombres.clone(),
            title: data.title.unwrap_or_default(),
            description: data.description.unwrap_or_default(),
            category: non_blank_or(data.category, DEFAULT_CATEGORY),
            budget: sanitize_budget(data.budget),
            location: non_blank_or(data.location, DEFAULT_LOCATION),
            status: JobStatus::Abierto,
            published_at: Utc::now(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == JobStatus::Abierto
    }
}

/// Job creation payload. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "coerce_budget")]
    pub budget: f64,
    pub location: Option<String>,
}

fn non_blank_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn sanitize_budget(budget: f64) -> f64 {
    if budget.is_finite() {
        budget
    } else {
        0.0
    }
}

/// Accept a number or a numeric string; anything else becomes 0.
fn coerce_budget<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(budget_from_value).unwrap_or(0.0))
}

pub fn budget_from_value(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    sanitize_budget(parsed.unwrap_or(0.0))
}
