//! Request-processing middleware and extractors.
//!
//! - [`gate`]: route-level access control applied to every request
//! - [`auth`]: extractors exposing the resolved session to handlers
//! - [`role`]: role checks for handlers and sub-routers
//!
//! # Flow
//!
//! 1. The browser sends the `session` cookie.
//! 2. [`gate::session_gate`] classifies the path, resolves the cookie and
//!    either allows, redirects or rejects. Allowed sessions are stored in the
//!    request extensions.
//! 3. Handlers take [`auth::AuthUser`] (or a role extractor) to read them.
//!
//! ```ignore
//! use crate::middleware::role::RequireAdmin;
//!
//! async fn delete_course(RequireAdmin(admin): RequireAdmin, Path(id): Path<CourseId>) {
//!     // only reached by ADMIN sessions
//! }
//! ```

pub mod auth;
pub mod gate;
pub mod role;
