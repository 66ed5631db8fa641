//! Session token codec.
//!
//! Tokens are compact JWS strings signed with HMAC-SHA256 using the single
//! process-wide secret from [`JwtConfig`]. A token is valid for
//! `session_expiry` seconds from the moment it was signed.
//!
//! # Example
//!
//! ```ignore
//! let token = encode_session(&payload, &jwt_config)?;
//! let claims = decode_session(&token, &jwt_config)?;
//! assert_eq!(claims.payload(), payload);
//! ```

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use thiserror::Error;

use vibeflix_config::JwtConfig;

use crate::claims::{SessionClaims, SessionPayload};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
    #[error("failed to sign token: {0}")]
    Encoding(String),
}

/// Signs `payload` with a fresh validity window starting now.
pub fn encode_session(payload: &SessionPayload, config: &JwtConfig) -> Result<String, TokenError> {
    encode_session_at(payload, Utc::now().timestamp(), config)
}

/// Signs `payload` as if it had been issued at `issued_at`.
pub fn encode_session_at(
    payload: &SessionPayload,
    issued_at: i64,
    config: &JwtConfig,
) -> Result<String, TokenError> {
    let claims = SessionClaims {
        user_id: payload.user_id,
        email: payload.email.clone(),
        role: payload.role,
        iat: issued_at,
        exp: issued_at + config.session_expiry,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Verifies signature and expiry and returns the claims.
///
/// There is no leeway on expiry: a token whose `exp` has been reached is
/// already expired. There is no database lookup either, so a user removed
/// after issuance keeps a decodable token until it expires.
pub fn decode_session(token: &str, config: &JwtConfig) -> Result<SessionClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp"]);

    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    })
    .and_then(|data| {
        // jsonwebtoken still accepts exp == now
        if data.claims.exp <= Utc::now().timestamp() {
            Err(TokenError::Expired)
        } else {
            Ok(data.claims)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;
    use uuid::Uuid;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            ..JwtConfig::default()
        }
    }

    fn payload(role: Role) -> SessionPayload {
        SessionPayload {
            user_id: Uuid::new_v4(),
            email: "aluno@vibeflix.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_round_trip_preserves_payload() {
        let config = config("round-trip-secret");
        let payload = payload(Role::Student);

        let token = encode_session(&payload, &config).unwrap();
        let claims = decode_session(&token, &config).unwrap();

        assert_eq!(claims.payload(), payload);
        assert_eq!(claims.exp - claims.iat, config.session_expiry);
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let token = encode_session(&payload(Role::Admin), &config("secret-a")).unwrap();
        let result = decode_session(&token, &config("secret-b"));
        assert!(matches!(result, Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = config("expiry-secret");
        let issued_at = Utc::now().timestamp() - config.session_expiry - 60;

        let token = encode_session_at(&payload(Role::Student), issued_at, &config).unwrap();
        let result = decode_session(&token, &config);

        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_token_at_exact_expiry_is_rejected() {
        let config = config("boundary-secret");
        let issued_at = Utc::now().timestamp() - config.session_expiry;

        let token = encode_session_at(&payload(Role::Student), issued_at, &config).unwrap();
        let result = decode_session(&token, &config);

        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_token_inside_window_is_accepted() {
        let config = config("window-secret");
        let issued_at = Utc::now().timestamp() - config.session_expiry + 120;

        let token = encode_session_at(&payload(Role::Student), issued_at, &config).unwrap();
        assert!(decode_session(&token, &config).is_ok());
    }

    #[test]
    fn test_garbage_is_malformed() {
        let result = decode_session("not.a.token", &config("any"));
        assert!(matches!(result, Err(TokenError::Malformed)));

        let result = decode_session("", &config("any"));
        assert!(matches!(result, Err(TokenError::Malformed)));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let config = config("tamper-secret");
        let token = encode_session(&payload(Role::Student), &config).unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = encode_session(&payload(Role::Admin), &config).unwrap();
        let forged_body = forged.split('.').nth(1).unwrap().to_string();
        parts[1] = &forged_body;
        let spliced = parts.join(".");

        assert!(decode_session(&spliced, &config).is_err());
    }
}
