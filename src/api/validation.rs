use std::borrow::Cow;

use actix_web::HttpResponse;
use serde::Serialize;
use validator::ValidationError;

/// Uniform error body returned by every endpoint
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
}

/// Project-wide `JsonConfig`: validation and deserialization failures become
/// a 400 with an [`ErrorResponse`] body.
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default().error_handler(|err, _req| {
        let (error, fields) = match err {
            actix_web_validator::Error::Validate(validation_errors) => {
                let fields: serde_json::Map<String, serde_json::Value> = validation_errors
                    .field_errors()
                    .into_iter()
                    .map(|(field, errors)| {
                        let messages: Vec<String> = errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| {
                                        format!("Validation error in field: {}", field)
                                    })
                            })
                            .collect();
                        (field.to_string(), serde_json::json!({ "errors": messages }))
                    })
                    .collect();
                ("Validation failed", serde_json::Value::Object(fields))
            }
            actix_web_validator::Error::Deserialize(de_err) => (
                "Request validation failed",
                serde_json::json!({ "message": deserialize_message(&de_err.to_string()) }),
            ),
            // Body extraction reports serde failures through the payload error
            actix_web_validator::Error::JsonPayloadError(payload_err) => (
                "Request validation failed",
                serde_json::json!({ "message": deserialize_message(&payload_err.to_string()) }),
            ),
            _ => ("Validation failed", serde_json::json!({ "message": "Validation error" })),
        };

        actix_web::error::InternalError::from_response(
            "",
            HttpResponse::BadRequest().json(ErrorResponse {
                error: error.to_string(),
                fields,
            }),
        )
        .into()
    })
}

/// Client-facing message for a JSON body that could not be deserialized
fn deserialize_message(err: &str) -> &'static str {
    if err.contains("EOF while parsing") {
        "Request body is empty. Expected JSON payload"
    } else if err.contains("unknown variant") {
        "Invalid enum value. Check allowed values for this field"
    } else if err.contains("missing field") {
        "Missing required field in JSON payload"
    } else {
        "Invalid JSON format"
    }
}

/// Special characters that count towards password strength
const PASSWORD_SYMBOLS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*'];

/// Minimum strength score a registration password must reach
pub const MIN_PASSWORD_STRENGTH: u8 = 60;

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Cedula: 8 to 10 digits
pub fn validate_cedula(cedula: &str) -> Result<(), ValidationError> {
    let digits_only = cedula.chars().all(|c| c.is_ascii_digit());
    if digits_only && (8..=10).contains(&cedula.len()) {
        Ok(())
    } else {
        Err(invalid("cedula", "Formato de cédula inválido (8-10 dígitos)"))
    }
}

/// Nombres: letters and spaces only, at least a first and a last name
pub fn validate_nombres(nombres: &str) -> Result<(), ValidationError> {
    let has_surname = nombres.trim().contains(' ');
    let only_letters = nombres.chars().all(|c| c.is_alphabetic() || c.is_whitespace());
    if has_surname && only_letters && nombres.chars().count() >= 5 {
        Ok(())
    } else {
        Err(invalid("nombres", "El nombre debe ser real y tener al menos un apellido"))
    }
}

/// Score from 0 to 100 based on length and character classes
pub fn password_strength(password: &str) -> u8 {
    let mut strength = 0;
    if password.chars().count() >= 8 {
        strength += 25;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        strength += 25;
    }
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        strength += 20;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        strength += 15;
    }
    if password.chars().any(|c| PASSWORD_SYMBOLS.contains(&c)) {
        strength += 15;
    }
    strength
}

pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() >= 8 && password_strength(password) >= MIN_PASSWORD_STRENGTH {
        Ok(())
    } else {
        Err(invalid("password", "La contraseña es muy débil"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("12345678", true)]
    #[case("1234567890", true)]
    #[case("1234567", false)]
    #[case("12345678901", false)]
    #[case("1234a678", false)]
    fn cedula_rules(#[case] cedula: &str, #[case] valid: bool) {
        assert_eq!(validate_cedula(cedula).is_ok(), valid);
    }

    #[rstest]
    #[case("María Rodríguez", true)]
    #[case("Juan", false)]
    #[case("Ana 2 Torres", false)]
    #[case("Al B", false)]
    fn nombres_rules(#[case] nombres: &str, #[case] valid: bool) {
        assert_eq!(validate_nombres(nombres).is_ok(), valid);
    }

    #[rstest]
    #[case("abc", 20)]
    #[case("abcdefgh", 45)]
    #[case("Abcdefgh", 70)]
    #[case("Abcdefg1!", 100)]
    fn strength_scores(#[case] password: &str, #[case] expected: u8) {
        assert_eq!(password_strength(password), expected);
    }

    #[derive(Debug, serde::Deserialize)]
    #[allow(dead_code)]
    struct Body {
        status: crate::api::application::models::ApplicationStatus,
    }

    #[rstest]
    #[case("", "Request body is empty. Expected JSON payload")]
    #[case(r#"{"status":"QUIZAS"}"#, "Invalid enum value. Check allowed values for this field")]
    #[case("{}", "Missing required field in JSON payload")]
    #[case(r#"{"status":5}"#, "Invalid JSON format")]
    fn payload_errors_get_readable_messages(#[case] body: &str, #[case] expected: &str) {
        let serde_err = serde_json::from_str::<Body>(body).unwrap_err();
        let payload_err = actix_web::error::JsonPayloadError::Deserialize(serde_err);
        assert_eq!(deserialize_message(&payload_err.to_string()), expected);
    }

    #[test]
    fn weak_passwords_are_rejected() {
        assert!(validate_password_strength("12345").is_err());
        assert!(validate_password_strength("abcdefgh").is_err());
        assert!(validate_password_strength("Abcdefgh").is_ok());
    }
}
