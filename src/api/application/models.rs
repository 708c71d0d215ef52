use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::auth::models::{generate_id, PublicUser};
use crate::api::error::MarketError;

/// Title shown when an application points at a job that no longer exists.
pub const MISSING_JOB_TITLE: &str = "Trabajo no encontrado";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pendiente,
    Aceptada,
    Rechazada,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pendiente => "PENDIENTE",
            ApplicationStatus::Aceptada => "ACEPTADA",
            ApplicationStatus::Rechazada => "RECHAZADA",
        }
    }

    /// Whether a client decision may set this status.
    pub fn is_decision(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Aceptada | ApplicationStatus::Rechazada
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDIENTE" => Ok(ApplicationStatus::Pendiente),
            "ACEPTADA" => Ok(ApplicationStatus::Aceptada),
            "RECHAZADA" => Ok(ApplicationStatus::Rechazada),
            other => Err(MarketError::CorruptRecord(format!(
                "unknown application status {other}"
            ))),
        }
    }
}

/// A worker's application to a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub job_id: String,
    pub worker_id: String,
    pub worker_name: String,
    pub message: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

impl Application {
    pub fn new(job_id: &str, worker: &PublicUser, message: String) -> Self {
        Application {
            id: generate_id(),
            job_id: job_id.to_string(),
            worker_id: worker.id.clone(),
            worker_name: worker.nombres.clone(),
            message,
            status: ApplicationStatus::Pendiente,
            applied_at: Utc::now(),
        }
    }

    /// Move a pending application to a decided status.
    pub fn transition(&mut self, to: ApplicationStatus) -> Result<(), MarketError> {
        check_transition(self.status, to)?;
        self.status = to;
        Ok(())
    }
}

/// PENDIENTE -> ACEPTADA | RECHAZADA is the only legal move.
pub fn check_transition(
    from: ApplicationStatus,
    to: ApplicationStatus,
) -> Result<(), MarketError> {
    if from != ApplicationStatus::Pendiente || !to.is_decision() {
        return Err(MarketError::InvalidTransition { from, to });
    }
    Ok(())
}

/// Application joined with the title of the job it targets
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerApplication {
    #[serde(flatten)]
    pub application: Application,
    pub job_title: String,
}
