use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::api::application::models::Application;
use crate::api::auth::models::{Profile, Role, User};
use crate::api::error::MarketError;
use crate::api::job::models::Job;

/// Database representation of a user; role fields are nullable columns
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: String,
    pub nombres: String,
    pub cedula: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
    pub cargo: Option<String>,
    pub departamento: Option<String>,
    pub registration_date: DateTime<Utc>,
    pub last_access: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = MarketError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let profile = match row.role.parse::<Role>()? {
            Role::Cliente => Profile::Cliente {
                direccion: row.direccion.unwrap_or_default(),
                telefono: row.telefono.unwrap_or_default(),
            },
            Role::Trabajador => Profile::Trabajador {
                cargo: row.cargo.unwrap_or_default(),
                departamento: row.departamento.unwrap_or_default(),
            },
        };

        Ok(User {
            id: row.id,
            nombres: row.nombres,
            cedula: row.cedula,
            email: row.email,
            password_hash: row.password_hash,
            profile,
            registration_date: row.registration_date,
            last_access: row.last_access,
        })
    }
}

/// Role-specific columns for a profile, in table order
pub struct ProfileColumns<'a> {
    pub direccion: Option<&'a str>,
    pub telefono: Option<&'a str>,
    pub cargo: Option<&'a str>,
    pub departamento: Option<&'a str>,
}

impl<'a> From<&'a Profile> for ProfileColumns<'a> {
    fn from(profile: &'a Profile) -> Self {
        match profile {
            Profile::Cliente {
                direccion,
                telefono,
            } => ProfileColumns {
                direccion: Some(direccion.as_str()),
                telefono: Some(telefono.as_str()),
                cargo: None,
                departamento: None,
            },
            Profile::Trabajador {
                cargo,
                departamento,
            } => ProfileColumns {
                direccion: None,
                telefono: None,
                cargo: Some(cargo.as_str()),
                departamento: Some(departamento.as_str()),
            },
        }
    }
}

/// Database representation of a job
#[derive(Debug, FromRow)]
pub struct JobRow {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub budget: f64,
    pub location: String,
    pub status: String,
    pub published_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = MarketError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(Job {
            status: row.status.parse()?,
            id: row.id,
            client_id: row.client_id,
            client_name: row.client_name,
            title: row.title,
            description: row.description,
            category: row.category,
            budget: row.budget,
            location: row.location,
            published_at: row.published_at,
        })
    }
}

/// Database representation of an application
#[derive(Debug, FromRow)]
pub struct ApplicationRow {
    pub id: String,
    pub job_id: String,
    pub worker_id: String,
    pub worker_name: String,
    pub message: String,
    pub status: String,
    pub applied_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = MarketError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Application {
            status: row.status.parse()?,
            id: row.id,
            job_id: row.job_id,
            worker_id: row.worker_id,
            worker_name: row.worker_name,
            message: row.message,
            applied_at: row.applied_at,
        })
    }
}

/// Convert a batch of rows, failing on the first bad one
pub fn convert_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, MarketError>
where
    T: TryFrom<R, Error = MarketError>,
{
    rows.into_iter().map(T::try_from).collect()
}
