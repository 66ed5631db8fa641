use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;

use vibeflix_config::JwtConfig;

use crate::claims::SessionClaims;
use crate::jwt::decode_session;

pub const SESSION_COOKIE: &str = "session";

/// Resolves the `session` cookie into claims.
///
/// A missing cookie and any decode failure both mean anonymous.
pub fn resolve_session(jar: &CookieJar, config: &JwtConfig) -> Option<SessionClaims> {
    let cookie = jar.get(SESSION_COOKIE)?;

    match decode_session(cookie.value(), config) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!(reason = %e, "Ignoring invalid session cookie");
            None
        }
    }
}

pub fn session_cookie(token: String, config: &JwtConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies)
        .max_age(time::Duration::seconds(config.session_expiry))
        .build()
}

/// Cookie to pass to [`CookieJar::remove`]; the path must match the issued one.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

/// Whether a still-valid token is old enough to be re-issued.
pub fn needs_refresh(claims: &SessionClaims, config: &JwtConfig) -> bool {
    Utc::now().timestamp() - claims.iat >= config.refresh_after
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::SessionPayload;
    use crate::jwt::{encode_session, encode_session_at};
    use crate::role::Role;
    use axum::http::{HeaderMap, HeaderValue, header};
    use uuid::Uuid;

    fn payload() -> SessionPayload {
        SessionPayload {
            user_id: Uuid::new_v4(),
            email: "aluno@vibeflix.com".to_string(),
            role: Role::Student,
        }
    }

    fn jar_with(cookie_header: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie_header).unwrap());
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn test_missing_cookie_is_anonymous() {
        let jar = jar_with("theme=dark");
        assert!(resolve_session(&jar, &JwtConfig::default()).is_none());
    }

    #[test]
    fn test_valid_cookie_resolves() {
        let config = JwtConfig::default();
        let payload = payload();
        let token = encode_session(&payload, &config).unwrap();

        let jar = jar_with(&format!("theme=dark; session={}", token));
        let claims = resolve_session(&jar, &config).unwrap();

        assert_eq!(claims.user_id, payload.user_id);
    }

    #[test]
    fn test_invalid_cookie_falls_back_to_anonymous() {
        let jar = jar_with("session=garbage");
        assert!(resolve_session(&jar, &JwtConfig::default()).is_none());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let config = JwtConfig {
            secure_cookies: true,
            ..JwtConfig::default()
        };
        let cookie = session_cookie("abc".to_string(), &config);
        let rendered = cookie.to_string();

        assert!(rendered.starts_with("session=abc"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=604800"));
    }

    #[test]
    fn test_needs_refresh_after_threshold() {
        let config = JwtConfig::default();
        let fresh_token = encode_session(&payload(), &config).unwrap();
        let fresh = crate::jwt::decode_session(&fresh_token, &config).unwrap();
        assert!(!needs_refresh(&fresh, &config));

        let issued_at = Utc::now().timestamp() - config.refresh_after - 10;
        let old_token = encode_session_at(&payload(), issued_at, &config).unwrap();
        let old = crate::jwt::decode_session(&old_token, &config).unwrap();
        assert!(needs_refresh(&old, &config));
    }

    #[test]
    fn test_refresh_follows_age_not_time_left() {
        let config = JwtConfig {
            session_expiry: 36 * 3600,
            ..JwtConfig::default()
        };

        // 13h old, 23h left
        let issued_at = Utc::now().timestamp() - 13 * 3600;
        let token = encode_session_at(&payload(), issued_at, &config).unwrap();
        let claims = crate::jwt::decode_session(&token, &config).unwrap();
        assert!(!needs_refresh(&claims, &config));

        let issued_at = Utc::now().timestamp() - config.refresh_after;
        let token = encode_session_at(&payload(), issued_at, &config).unwrap();
        let claims = crate::jwt::decode_session(&token, &config).unwrap();
        assert!(needs_refresh(&claims, &config));
    }
}
