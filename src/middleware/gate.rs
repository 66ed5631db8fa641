//! Route-level access control.
//!
//! Every request is classified once against [`ROUTE_TABLE`], an ordered list of
//! path rules. The first matching rule decides what the caller needs:
//!
//! | Rule | Requirement | Failure |
//! |------|-------------|---------|
//! | `/`, `/login`, `/register`, `/api/auth/{login,register}`, docs, health | none | - |
//! | `/api/admin/*` | ADMIN | 401 anonymous, 403 `Acesso negado` otherwise |
//! | `/api/*` | any session | 401 `Não autenticado` |
//! | `/admin/*` | ADMIN | login redirect, students go to `/dashboard` |
//! | `/dashboard*`, `/courses*` | STUDENT | login redirect, admins go to `/admin/dashboard` |
//! | anything else | any session | login redirect |
//!
//! Public rules short-circuit before the cookie is read. For everything else the
//! resolved [`SessionClaims`] are placed in the request extensions, and tokens
//! older than the refresh threshold are re-issued on the way out.

use anyhow::anyhow;
use axum::{
    extract::{OriginalUri, Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use vibeflix_auth::{
    Role, SESSION_COOKIE, SessionClaims, encode_session, needs_refresh, resolve_session,
    session_cookie,
};
use vibeflix_core::AppError;

use crate::metrics::{track_gate_denied, track_session_refreshed};
use crate::state::AppState;

pub const UNAUTHENTICATED: &str = "Não autenticado";
pub const FORBIDDEN: &str = "Acesso negado";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPattern {
    Exact(&'static str),
    /// Matches the prefix itself and anything below it, on segment boundaries.
    Prefix(&'static str),
}

impl PathPattern {
    pub fn matches(&self, path: &str) -> bool {
        match *self {
            PathPattern::Exact(p) => path == p,
            PathPattern::Prefix(p) => path
                .strip_prefix(p)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/')),
        }
    }
}

/// JSON endpoints reject; pages redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Api,
    Page,
}

impl Surface {
    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Api => "api",
            Surface::Page => "page",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    AdminOnly,
    StudentOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    pub pattern: PathPattern,
    pub surface: Surface,
    pub access: Access,
}

const fn rule(pattern: PathPattern, surface: Surface, access: Access) -> RouteRule {
    RouteRule {
        pattern,
        surface,
        access,
    }
}

use Access::*;
use PathPattern::*;
use Surface::*;

pub static ROUTE_TABLE: &[RouteRule] = &[
    rule(Prefix("/health"), Api, Public),
    rule(Prefix("/swagger-ui"), Page, Public),
    rule(Prefix("/scalar"), Page, Public),
    rule(Prefix("/api-docs"), Page, Public),
    rule(Exact("/"), Page, Public),
    rule(Prefix("/login"), Page, Public),
    rule(Prefix("/register"), Page, Public),
    rule(Exact("/api/auth/login"), Api, Public),
    rule(Exact("/api/auth/register"), Api, Public),
    rule(Prefix("/api/admin"), Api, AdminOnly),
    rule(Prefix("/api"), Api, Authenticated),
    rule(Prefix("/admin"), Page, AdminOnly),
    rule(Prefix("/dashboard"), Page, StudentOnly),
    rule(Prefix("/courses"), Page, StudentOnly),
];

/// Applies to any path no rule claims.
pub const FALLBACK_RULE: RouteRule = rule(Prefix("/"), Page, Authenticated);

pub fn classify(path: &str) -> &'static RouteRule {
    ROUTE_TABLE
        .iter()
        .find(|rule| rule.pattern.matches(path))
        .unwrap_or(&FALLBACK_RULE)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(String),
    Reject(StatusCode, &'static str),
}

/// Pure decision for one request. `session` is `None` for anonymous callers,
/// including those whose cookie failed to decode.
pub fn decide(rule: &RouteRule, path: &str, session: Option<&SessionClaims>) -> GateDecision {
    if rule.access == Public {
        return GateDecision::Allow;
    }

    let Some(claims) = session else {
        return match rule.surface {
            Api => GateDecision::Reject(StatusCode::UNAUTHORIZED, UNAUTHENTICATED),
            Page => GateDecision::Redirect(login_redirect(path)),
        };
    };

    match (rule.access, claims.role) {
        (Public | Authenticated, _) => GateDecision::Allow,
        (AdminOnly, Role::Admin) | (StudentOnly, Role::Student) => GateDecision::Allow,
        (AdminOnly, Role::Student) => match rule.surface {
            Api => GateDecision::Reject(StatusCode::FORBIDDEN, FORBIDDEN),
            Page => GateDecision::Redirect(home_for(Role::Student).to_string()),
        },
        (StudentOnly, Role::Admin) => match rule.surface {
            Api => GateDecision::Reject(StatusCode::FORBIDDEN, FORBIDDEN),
            Page => GateDecision::Redirect(home_for(Role::Admin).to_string()),
        },
    }
}

/// Landing page of each role.
pub fn home_for(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin/dashboard",
        Role::Student => "/dashboard",
    }
}

pub fn login_redirect(path: &str) -> String {
    format!("/login?from={}", encode_from(path))
}

/// Percent-encodes everything except unreserved characters and `/`.
fn encode_from(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

pub async fn session_gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let rule = classify(&path);
    if rule.access == Public {
        return next.run(req).await;
    }

    let jar = CookieJar::from_headers(req.headers());
    let session = resolve_session(&jar, &state.jwt_config);

    match decide(rule, &path, session.as_ref()) {
        GateDecision::Allow => {}
        GateDecision::Redirect(location) => {
            debug!(path = %path, location = %location, "Gate redirect");
            track_gate_denied("redirect");
            return Redirect::temporary(&location).into_response();
        }
        GateDecision::Reject(status, message) => {
            debug!(path = %path, status = %status.as_u16(), "Gate rejection");
            track_gate_denied(if status == StatusCode::FORBIDDEN {
                "forbidden"
            } else {
                "unauthenticated"
            });
            return AppError::new(status, anyhow!(message)).into_response();
        }
    }

    let Some(claims) = session else {
        return next.run(req).await;
    };

    let refresh = needs_refresh(&claims, &state.jwt_config);
    req.extensions_mut().insert(claims.clone());

    let mut response = next.run(req).await;

    if refresh && !sets_session_cookie(&response) {
        match encode_session(&claims.payload(), &state.jwt_config) {
            Ok(token) => {
                let cookie = session_cookie(token, &state.jwt_config);
                match HeaderValue::from_str(&cookie.to_string()) {
                    Ok(value) => {
                        response.headers_mut().append(header::SET_COOKIE, value);
                        track_session_refreshed();
                    }
                    Err(e) => warn!(error = %e, "Refreshed session cookie is not a valid header"),
                }
            }
            Err(e) => warn!(error = %e, "Failed to refresh session token"),
        }
    }

    response
}

/// Login and logout write their own cookie; a refresh must not override it.
fn sets_session_cookie(response: &Response) -> bool {
    let prefix = format!("{}=", SESSION_COOKIE);
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with(&prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn claims(role: Role) -> SessionClaims {
        SessionClaims {
            user_id: Uuid::new_v4(),
            email: "user@vibeflix.com".to_string(),
            role,
            iat: 0,
            exp: i64::MAX,
        }
    }

    fn decide_path(path: &str, session: Option<&SessionClaims>) -> GateDecision {
        decide(classify(path), path, session)
    }

    #[test]
    fn test_prefix_is_segment_aware() {
        assert!(Prefix("/api").matches("/api"));
        assert!(Prefix("/api").matches("/api/courses"));
        assert!(!Prefix("/api").matches("/api-docs/openapi.json"));
        assert!(!Prefix("/admin").matches("/administrator"));
        assert!(Exact("/").matches("/"));
        assert!(!Exact("/").matches("/dashboard"));
    }

    #[test]
    fn test_classification_order() {
        assert_eq!(classify("/api/auth/login").access, Public);
        assert_eq!(classify("/api/auth/me").access, Authenticated);
        assert_eq!(classify("/api/admin/students").access, AdminOnly);
        assert_eq!(classify("/api-docs/openapi.json").access, Public);
        assert_eq!(classify("/courses/abc/lessons/def").access, StudentOnly);
        assert_eq!(classify("/profile"), &FALLBACK_RULE);
    }

    #[test]
    fn test_public_paths_allow_anonymous() {
        for path in ["/", "/login", "/register", "/api/auth/login", "/health"] {
            assert_eq!(decide_path(path, None), GateDecision::Allow, "{}", path);
        }
    }

    #[test]
    fn test_anonymous_api_is_unauthorized() {
        assert_eq!(
            decide_path("/api/courses", None),
            GateDecision::Reject(StatusCode::UNAUTHORIZED, UNAUTHENTICATED)
        );
        assert_eq!(
            decide_path("/api/admin/students", None),
            GateDecision::Reject(StatusCode::UNAUTHORIZED, UNAUTHENTICATED)
        );
    }

    #[test]
    fn test_anonymous_page_redirects_to_login_with_from() {
        assert_eq!(
            decide_path("/admin/dashboard", None),
            GateDecision::Redirect("/login?from=/admin/dashboard".to_string())
        );
        assert_eq!(
            decide_path("/profile", None),
            GateDecision::Redirect("/login?from=/profile".to_string())
        );
    }

    #[test]
    fn test_student_on_admin_routes() {
        let student = claims(Role::Student);
        assert_eq!(
            decide_path("/api/admin/students", Some(&student)),
            GateDecision::Reject(StatusCode::FORBIDDEN, FORBIDDEN)
        );
        assert_eq!(
            decide_path("/admin/dashboard", Some(&student)),
            GateDecision::Redirect("/dashboard".to_string())
        );
        assert_eq!(
            decide_path("/dashboard", Some(&student)),
            GateDecision::Allow
        );
    }

    #[test]
    fn test_admin_on_student_pages() {
        let admin = claims(Role::Admin);
        assert_eq!(
            decide_path("/dashboard", Some(&admin)),
            GateDecision::Redirect("/admin/dashboard".to_string())
        );
        assert_eq!(
            decide_path("/courses/123", Some(&admin)),
            GateDecision::Redirect("/admin/dashboard".to_string())
        );
        assert_eq!(
            decide_path("/api/admin/students", Some(&admin)),
            GateDecision::Allow
        );
        assert_eq!(decide_path("/api/courses", Some(&admin)), GateDecision::Allow);
    }

    #[test]
    fn test_from_parameter_encoding() {
        assert_eq!(login_redirect("/admin/students"), "/login?from=/admin/students");
        assert_eq!(
            login_redirect("/admin/a b&c"),
            "/login?from=/admin/a%20b%26c"
        );
    }
}
