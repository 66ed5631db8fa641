use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;

use vibeflix_auth::{Role, SessionClaims, resolve_session};
use vibeflix_core::AppError;
use vibeflix_models::UserId;

use crate::middleware::gate::UNAUTHENTICATED;
use crate::state::AppState;

/// The caller's session. Rejects with 401 when there is none.
///
/// Uses the claims the gate stored in the request extensions and only decodes
/// the cookie itself on routes the gate treats as public.
#[derive(Debug, Clone)]
pub struct AuthUser(pub SessionClaims);

impl AuthUser {
    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.0.user_id)
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn is_admin(&self) -> bool {
        self.0.is_admin()
    }
}

fn session_from_parts(parts: &Parts, state: &AppState) -> Option<SessionClaims> {
    if let Some(claims) = parts.extensions.get::<SessionClaims>() {
        return Some(claims.clone());
    }

    let jar = CookieJar::from_headers(&parts.headers);
    resolve_session(&jar, &state.jwt_config)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        session_from_parts(parts, state)
            .map(AuthUser)
            .ok_or_else(|| AppError::unauthorized(UNAUTHENTICATED.to_string()))
    }
}

/// Session if present; never rejects. For public pages that vary by viewer.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(session_from_parts(parts, state).map(AuthUser)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_accessors() {
        let user_id = Uuid::new_v4();
        let auth_user = AuthUser(SessionClaims {
            user_id,
            email: "admin@vibeflix.com".to_string(),
            role: Role::Admin,
            iat: 1,
            exp: 2,
        });

        assert_eq!(auth_user.user_id().into_inner(), user_id);
        assert_eq!(auth_user.email(), "admin@vibeflix.com");
        assert_eq!(auth_user.role(), Role::Admin);
        assert!(auth_user.is_admin());
    }
}
