//! Session claim structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

/// What the server asserts about a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPayload {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Claims carried inside the `session` cookie token.
///
/// `iat` and `exp` are Unix timestamps in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn payload(&self) -> SessionPayload {
        SessionPayload {
            user_id: self.user_id,
            email: self.email.clone(),
            role: self.role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize_with_camel_case_user_id() {
        let claims = SessionClaims {
            user_id: Uuid::nil(),
            email: "aluno@vibeflix.com".to_string(),
            role: Role::Student,
            iat: 1_700_000_000,
            exp: 1_700_604_800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""userId":"00000000-0000-0000-0000-000000000000""#));
        assert!(serialized.contains(r#""role":"STUDENT""#));
    }

    #[test]
    fn test_payload_drops_timestamps() {
        let user_id = Uuid::new_v4();
        let claims = SessionClaims {
            user_id,
            email: "admin@vibeflix.com".to_string(),
            role: Role::Admin,
            iat: 1,
            exp: 2,
        };
        let payload = claims.payload();
        assert_eq!(payload.user_id, user_id);
        assert_eq!(payload.role, Role::Admin);
    }
}
