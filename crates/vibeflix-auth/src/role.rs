use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The two kinds of account. Every gate matches on this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Student => "STUDENT",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""ADMIN""#);
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), r#""STUDENT""#);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let parsed: Result<Role, _> = serde_json::from_str(r#""INSTRUCTOR""#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_display_matches_wire_form() {
        assert_eq!(Role::Student.to_string(), "STUDENT");
        assert!(Role::Admin.is_admin());
        assert!(!Role::Student.is_admin());
    }
}
