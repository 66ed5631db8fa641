//! Authentication request and response payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::User;

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Email inválido"))]
    pub email: String,
    #[validate(length(min = 6, message = "Senha deve ter no mínimo 6 caracteres"))]
    pub password: String,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 2, message = "Nome deve ter no mínimo 2 caracteres"))]
    pub name: String,
    #[validate(email(message = "Email inválido"))]
    pub email: String,
    #[validate(length(min = 6, message = "Senha deve ter no mínimo 6 caracteres"))]
    pub password: String,
}

/// Body of login, register and `me`; the session itself travels in the cookie.
#[derive(Serialize, Debug, ToSchema)]
pub struct AuthResponse {
    pub user: User,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_rejects_short_password() {
        let dto = LoginRequest {
            email: "aluno@vibeflix.com".to_string(),
            password: "12345".to_string(),
        };
        let errors = dto.validate().unwrap_err();
        let password_errors = &errors.field_errors()["password"];
        assert_eq!(
            password_errors[0].message.as_deref(),
            Some("Senha deve ter no mínimo 6 caracteres")
        );
    }

    #[test]
    fn test_register_request_accepts_valid_payload() {
        let dto = RegisterRequest {
            name: "Novo Aluno".to_string(),
            email: "novo@vibeflix.com".to_string(),
            password: "segredo".to_string(),
        };
        assert!(dto.validate().is_ok());
    }
}
