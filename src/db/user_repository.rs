use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use tracing::debug;

use crate::api::auth::models::User;
use crate::api::error::MarketError;
use crate::db::models::{ProfileColumns, UserRow};
use crate::db::repository::UserRepository;
use crate::db::unique_violation_or;

const USER_COLUMNS: &str = "id, nombres, cedula, email, password_hash, role, direccion, \
     telefono, cargo, departamento, registration_date, last_access";

/// PostgreSQL-backed user storage
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: &User) -> Result<(), MarketError> {
        debug!("Inserting user: id={}, role={}", user.id, user.role());

        let columns = ProfileColumns::from(&user.profile);
        sqlx::query(
            r#"
            INSERT INTO users (id, nombres, cedula, email, password_hash, role,
                               direccion, telefono, cargo, departamento,
                               registration_date, last_access)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(&user.id)
        .bind(&user.nombres)
        .bind(&user.cedula)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role().as_str())
        .bind(columns.direccion)
        .bind(columns.telefono)
        .bind(columns.cargo)
        .bind(columns.departamento)
        .bind(user.registration_date)
        .bind(user.last_access)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation_or(e, || MarketError::DuplicateEmail))?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, MarketError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, MarketError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn touch_last_access(&self, id: &str, at: DateTime<Utc>) -> Result<(), MarketError> {
        sqlx::query("UPDATE users SET last_access = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count(&self) -> Result<usize, MarketError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}
