use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;

use crate::api::application::models::{check_transition, Application, ApplicationStatus};
use crate::api::error::MarketError;
use crate::db::models::{convert_rows, ApplicationRow};
use crate::db::repository::ApplicationRepository;
use crate::db::unique_violation_or;

const APPLICATION_COLUMNS: &str =
    "id, job_id, worker_id, worker_name, message, status, applied_at";

/// PostgreSQL-backed application storage
///
/// The `(job_id, worker_id)` unique constraint backs the one application
/// per worker and job rule.
pub struct PgApplicationRepository {
    pool: Pool<Postgres>,
}

impl PgApplicationRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    async fn insert(&self, application: &Application) -> Result<(), MarketError> {
        debug!(
            "Inserting application: id={}, job_id={}, worker_id={}",
            application.id, application.job_id, application.worker_id
        );

        sqlx::query(
            r#"
            INSERT INTO applications (id, job_id, worker_id, worker_name,
                                      message, status, applied_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&application.id)
        .bind(&application.job_id)
        .bind(&application.worker_id)
        .bind(&application.worker_name)
        .bind(&application.message)
        .bind(application.status.as_str())
        .bind(application.applied_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            unique_violation_or(e, || MarketError::DuplicateApplication {
                job_id: application.job_id.clone(),
                worker_id: application.worker_id.clone(),
            })
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Application>, MarketError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Application::try_from).transpose()
    }

    async fn list_by_job(&self, job_id: &str) -> Result<Vec<Application>, MarketError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE job_id = $1 ORDER BY seq"
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        convert_rows(rows)
    }

    async fn list_by_worker(&self, worker_id: &str) -> Result<Vec<Application>, MarketError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE worker_id = $1 ORDER BY seq"
        ))
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await?;

        convert_rows(rows)
    }

    async fn update_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<Application, MarketError> {
        if check_transition(ApplicationStatus::Pendiente, status).is_err() {
            return Err(self.rejected_update(id, status).await);
        }

        // Conditional update: only a still-pending row changes
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "UPDATE applications SET status = $2 WHERE id = $1 AND status = $3 \
             RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(ApplicationStatus::Pendiente.as_str())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            debug!("Application {} moved to {}", id, status);
            return Application::try_from(row);
        }

        Err(self.rejected_update(id, status).await)
    }
}

impl PgApplicationRepository {
    /// Why an update to `status` did not apply: missing row or wrong state
    async fn rejected_update(&self, id: &str, status: ApplicationStatus) -> MarketError {
        match self.find_by_id(id).await {
            Ok(Some(current)) => MarketError::InvalidTransition {
                from: current.status,
                to: status,
            },
            Ok(None) => MarketError::not_found("Postulación", id),
            Err(e) => e,
        }
    }
}
