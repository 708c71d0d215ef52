use serde::{Deserialize, Serialize};
use validator::Validate;

use super::models::{Profile, PublicUser, Registration, Role, Session};

/// Registration payload
///
/// Role-specific fields are read according to `role`; the others are ignored.
#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(custom(function = "crate::api::validation::validate_nombres"))]
    pub nombres: String,
    #[validate(custom(function = "crate::api::validation::validate_cedula"))]
    pub cedula: String,
    #[validate(email(message = "Por favor ingresa un email válido"))]
    pub email: String,
    #[validate(custom(function = "crate::api::validation::validate_password_strength"))]
    pub password: String,
    pub role: Role,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
    pub cargo: Option<String>,
    pub departamento: Option<String>,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        let profile = match req.role {
            Role::Cliente => Profile::Cliente {
                direccion: req.direccion.unwrap_or_default(),
                telefono: req.telefono.unwrap_or_default(),
            },
            Role::Trabajador => Profile::Trabajador {
                cargo: req.cargo.unwrap_or_default(),
                departamento: req.departamento.unwrap_or_default(),
            },
        };

        Registration {
            nombres: req.nombres,
            cedula: req.cedula,
            email: req.email,
            password: req.password,
            profile,
        }
    }
}

/// Login payload
#[derive(Deserialize, Debug, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "El email es requerido"))]
    pub email: String,
    #[validate(length(min = 1, message = "La contraseña es requerida"))]
    pub password: String,
}

/// Response for register and login
#[derive(Serialize)]
pub struct SessionResponse {
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

impl SessionResponse {
    pub fn new(message: &str, session: Session) -> Self {
        Self {
            message: message.to_string(),
            token: session.token,
            user: session.user,
        }
    }
}

/// Response for the current session lookup
#[derive(Serialize)]
pub struct CurrentSessionResponse {
    pub user: PublicUser,
}
