use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::auth::password;
use crate::api::error::MarketError;

/// Marketplace role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Cliente,
    Trabajador,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Cliente => "CLIENTE",
            Role::Trabajador => "TRABAJADOR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CLIENTE" => Ok(Role::Cliente),
            "TRABAJADOR" => Ok(Role::Trabajador),
            other => Err(MarketError::CorruptRecord(format!("unknown role {other}"))),
        }
    }
}

/// Role tag plus the fields only that role carries.
///
/// Serialized inline into the owning record, e.g.
/// `{"role": "CLIENTE", "direccion": "...", "telefono": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Profile {
    Cliente {
        #[serde(default)]
        direccion: String,
        #[serde(default)]
        telefono: String,
    },
    Trabajador {
        #[serde(default)]
        cargo: String,
        #[serde(default)]
        departamento: String,
    },
}

impl Profile {
    pub fn role(&self) -> Role {
        match self {
            Profile::Cliente { .. } => Role::Cliente,
            Profile::Trabajador { .. } => Role::Trabajador,
        }
    }
}

/// Data collected at registration time
#[derive(Debug, Clone)]
pub struct Registration {
    pub nombres: String,
    pub cedula: String,
    pub email: String,
    pub password: String,
    pub profile: Profile,
}

/// Persisted user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub nombres: String,
    pub cedula: String,
    pub email: String,
    pub password_hash: String,
    #[serde(flatten)]
    pub profile: Profile,
    pub registration_date: DateTime<Utc>,
    pub last_access: DateTime<Utc>,
}

impl User {
    /// Build a new user from a registration, hashing the password with
    /// bcrypt at `password_cost`.
    ///
    /// Fails with `MissingRequiredField` when `nombres`, `cedula` or `email`
    /// is blank; nothing is hashed in that case.
    pub async fn new(registration: Registration, password_cost: u32) -> Result<Self, MarketError> {
        let Registration {
            nombres,
            cedula,
            email,
            password,
            profile,
        } = registration;

        require("nombres", &nombres)?;
        require("cedula", &cedula)?;
        require("email", &email)?;

        let password_hash = password::hash_password(&password, password_cost).await?;
        let now = Utc::now();
        Ok(User {
            id: generate_id(),
            nombres,
            cedula,
            email,
            password_hash,
            profile,
            registration_date: now,
            last_access: now,
        })
    }

    pub fn role(&self) -> Role {
        self.profile.role()
    }

    /// The user as exposed to sessions and API responses, without credentials.
    pub fn public_view(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            nombres: self.nombres.clone(),
            cedula: self.cedula.clone(),
            email: self.email.clone(),
            profile: self.profile.clone(),
            registration_date: self.registration_date,
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Usuario {}] {} ({})", self.role(), self.nombres, self.email)
    }
}

/// Credential-free view of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub nombres: String,
    pub cedula: String,
    pub email: String,
    #[serde(flatten)]
    pub profile: Profile,
    pub registration_date: DateTime<Utc>,
}

impl PublicUser {
    pub fn role(&self) -> Role {
        self.profile.role()
    }
}

/// An open session: opaque token plus the user it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub token: String,
    pub user: PublicUser,
}

fn require(field: &'static str, value: &str) -> Result<(), MarketError> {
    if value.trim().is_empty() {
        return Err(MarketError::MissingRequiredField(field));
    }
    Ok(())
}

/// Unique identifier for a newly created record.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
