use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use tracing::{error, warn};

use crate::api::application::models::ApplicationStatus;
use crate::api::validation::ErrorResponse;

/// Errors surfaced by the marketplace services.
///
/// Every failure is scoped to the single requested operation; nothing here
/// is retried or treated as fatal.
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("El correo electrónico ya está registrado")]
    DuplicateEmail,

    #[error("Credenciales inválidas. Por favor verifica tu correo y contraseña.")]
    InvalidCredentials,

    #[error("Ya te has postulado a este trabajo")]
    DuplicateApplication { job_id: String, worker_id: String },

    #[error("Datos obligatorios faltantes para el usuario: {0}")]
    MissingRequiredField(&'static str),

    #[error("{entity} no encontrado: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Operación no permitida: {0}")]
    Forbidden(String),

    #[error("Sesión inválida o expirada")]
    Unauthenticated,

    #[error("Transición de estado inválida: {from} -> {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("stored record is invalid: {0}")]
    CorruptRecord(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MarketError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        MarketError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        MarketError::Forbidden(reason.into())
    }

    /// True for failures inside the service rather than of the request.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            MarketError::PasswordHash(_)
                | MarketError::CorruptRecord(_)
                | MarketError::Database(_)
                | MarketError::Io(_)
                | MarketError::Serialization(_)
        )
    }

    fn label(&self) -> &'static str {
        match self {
            MarketError::DuplicateEmail => "Duplicate email",
            MarketError::InvalidCredentials => "Invalid credentials",
            MarketError::DuplicateApplication { .. } => "Duplicate application",
            MarketError::MissingRequiredField(_) => "Missing required field",
            MarketError::NotFound { .. } => "Not found",
            MarketError::Forbidden(_) => "Forbidden",
            MarketError::Unauthenticated => "Unauthenticated",
            MarketError::InvalidTransition { .. } => "Invalid transition",
            _ => "Failed to process request",
        }
    }
}

impl ResponseError for MarketError {
    fn status_code(&self) -> StatusCode {
        match self {
            MarketError::DuplicateEmail | MarketError::DuplicateApplication { .. } => {
                StatusCode::CONFLICT
            }
            MarketError::InvalidCredentials | MarketError::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            MarketError::Forbidden(_) => StatusCode::FORBIDDEN,
            MarketError::NotFound { .. } => StatusCode::NOT_FOUND,
            MarketError::MissingRequiredField(_) | MarketError::InvalidTransition { .. } => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Internal details stay in the logs
        let message = if self.is_internal() {
            error!("Internal error: {}", self);
            "Internal error occurred".to_string()
        } else {
            warn!("Request rejected: {}", self);
            self.to_string()
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.label().to_string(),
            fields: serde_json::json!({ "message": message }),
        })
    }
}
