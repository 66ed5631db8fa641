//! Role-based authorization for handlers and sub-routers.
//!
//! Two ways to require a role:
//! 1. Layer-based, with [`require_admin`] via `middleware::from_fn_with_state`
//! 2. Extractor-based, with [`RequireAdmin`] / [`RequireStudent`]
//!
//! plus [`check_role`] for checks inside handler logic.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use vibeflix_auth::Role;
use vibeflix_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::middleware::gate::FORBIDDEN;
use crate::state::AppState;

/// Fails with 403 `Acesso negado` unless the session has `required_role`.
pub fn check_role(auth_user: &AuthUser, required_role: Role) -> Result<(), AppError> {
    if auth_user.role() != required_role {
        tracing::debug!(
            user_id = %auth_user.user_id(),
            required = %required_role,
            actual = %auth_user.role(),
            "Role check failed"
        );
        return Err(AppError::forbidden(FORBIDDEN.to_string()));
    }

    Ok(())
}

/// Router layer for admin-only sub-routers.
///
/// ```rust,ignore
/// Router::new()
///     .nest("/admin/students", init_students_router())
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let auth_user = match AuthUser::from_request_parts(&mut parts, &state).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    if let Err(err) = check_role(&auth_user, Role::Admin) {
        return err.into_response();
    }

    next.run(Request::from_parts(parts, body)).await
}

#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        check_role(&auth_user, Role::Admin)?;
        Ok(RequireAdmin(auth_user))
    }
}

#[derive(Debug, Clone)]
pub struct RequireStudent(pub AuthUser);

impl FromRequestParts<AppState> for RequireStudent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        check_role(&auth_user, Role::Student)?;
        Ok(RequireStudent(auth_user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use uuid::Uuid;
    use vibeflix_auth::SessionClaims;

    fn auth_user(role: Role) -> AuthUser {
        AuthUser(SessionClaims {
            user_id: Uuid::new_v4(),
            email: "user@vibeflix.com".to_string(),
            role,
            iat: 0,
            exp: i64::MAX,
        })
    }

    #[test]
    fn test_check_role_matching() {
        assert!(check_role(&auth_user(Role::Admin), Role::Admin).is_ok());
        assert!(check_role(&auth_user(Role::Student), Role::Student).is_ok());
    }

    #[test]
    fn test_check_role_mismatch_is_forbidden() {
        let err = check_role(&auth_user(Role::Student), Role::Admin).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.error.to_string(), "Acesso negado");

        let err = check_role(&auth_user(Role::Admin), Role::Student).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }
}
