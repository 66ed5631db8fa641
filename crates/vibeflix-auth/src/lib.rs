//! # Vibeflix Auth
//!
//! Stateless cookie sessions for the Vibeflix API.
//!
//! - [`role`]: the closed set of user roles
//! - [`claims`]: the signed session payload
//! - [`jwt`]: HS256 token encoding and verification
//! - [`session`]: resolving the `session` cookie and building its replacements
//!
//! Tokens are never stored server-side: validity is signature plus expiry.
//!
//! # Example
//!
//! ```ignore
//! use vibeflix_auth::{SessionPayload, encode_session, resolve_session, session_cookie};
//!
//! let token = encode_session(&SessionPayload { user_id, email, role }, &config)?;
//! let jar = jar.add(session_cookie(token, &config));
//!
//! // later, on another request
//! let identity = resolve_session(&jar, &config); // None means anonymous
//! ```

pub mod claims;
pub mod jwt;
pub mod role;
pub mod session;

pub use claims::{SessionClaims, SessionPayload};
pub use jwt::{TokenError, decode_session, encode_session, encode_session_at};
pub use role::Role;
pub use session::{
    SESSION_COOKIE, clear_session_cookie, needs_refresh, resolve_session, session_cookie,
};
