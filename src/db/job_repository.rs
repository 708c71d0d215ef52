use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;

use crate::api::error::MarketError;
use crate::api::job::models::Job;
use crate::db::models::{convert_rows, JobRow};
use crate::db::repository::JobRepository;

const JOB_COLUMNS: &str = "id, client_id, client_name, title, description, category, budget, \
     location, status, published_at";

/// PostgreSQL-backed job storage
///
/// `seq` preserves insertion order; listing newest first means `seq DESC`.
pub struct PgJobRepository {
    pool: Pool<Postgres>,
}

impl PgJobRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn insert(&self, job: &Job) -> Result<(), MarketError> {
        debug!("Creating job: id={}, client_id={}", job.id, job.client_id);

        sqlx::query(
            r#"
            INSERT INTO jobs (id, client_id, client_name, title, description,
                              category, budget, location, status, published_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&job.id)
        .bind(&job.client_id)
        .bind(&job.client_name)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.category)
        .bind(job.budget)
        .bind(&job.location)
        .bind(job.status.as_str())
        .bind(job.published_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<Job>, MarketError> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs ORDER BY seq DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        convert_rows(rows)
    }

    async fn list_by_client(&self, client_id: &str) -> Result<Vec<Job>, MarketError> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE client_id = $1 ORDER BY seq DESC"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        convert_rows(rows)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Job>, MarketError> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Job::try_from).transpose()
    }
}
