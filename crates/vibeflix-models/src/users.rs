//! User models and the student administration DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::UserId;
use vibeflix_auth::Role;

/// A user as returned by the API. The password hash never leaves the service layer.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row used by login: the user plus the stored bcrypt hash.
#[derive(FromRow, Debug, Clone)]
pub struct UserCredentials {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserCredentials {
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            email: self.email,
            name: self.name,
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Author/owner reference embedded in other payloads.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Student listing entry for the admin area.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentWithStats {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub enrollment_count: i64,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentDto {
    #[validate(length(min = 2, message = "Nome deve ter no mínimo 2 caracteres"))]
    pub name: String,
    #[validate(email(message = "Email inválido"))]
    pub email: String,
    #[validate(length(min = 6, message = "Senha deve ter no mínimo 6 caracteres"))]
    pub password: String,
}

/// Partial update; absent fields keep their stored value.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentDto {
    #[validate(length(min = 2, message = "Nome deve ter no mínimo 2 caracteres"))]
    pub name: Option<String>,
    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Senha deve ter no mínimo 6 caracteres"))]
    pub password: Option<String>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct StudentsResponse {
    pub students: Vec<StudentWithStats>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct StudentResponse {
    pub student: StudentWithStats,
}

/// Body of student create and update.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct UserResponse {
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_student_validation() {
        let dto = CreateStudentDto {
            name: "A".to_string(),
            email: "not-an-email".to_string(),
            password: "123".to_string(),
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_update_student_skips_absent_fields() {
        let dto = UpdateStudentDto {
            name: Some("Aluno Renomeado".to_string()),
            ..UpdateStudentDto::default()
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_user_serializes_camel_case_without_password() {
        let now = Utc::now();
        let credentials = UserCredentials {
            id: UserId::new(),
            email: "aluno@vibeflix.com".to_string(),
            name: "Aluno Teste".to_string(),
            password: "$2b$12$hash".to_string(),
            role: Role::Student,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(credentials.into_user()).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["role"], "STUDENT");
    }
}
