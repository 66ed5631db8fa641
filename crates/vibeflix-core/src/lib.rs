//! # Vibeflix Core
//!
//! Foundational types shared by every Vibeflix crate.
//!
//! - [`errors`]: the [`AppError`] type and its JSON response conversion
//! - [`password`]: bcrypt password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use vibeflix_core::{AppError, hash_password, verify_password};
//!
//! let hash = hash_password("student123")?;
//! if !verify_password("student123", &hash)? {
//!     return Err(AppError::unauthorized("Email ou senha inválidos".to_string()));
//! }
//! ```

pub mod errors;
pub mod password;

pub use errors::AppError;
pub use password::{hash_password, verify_password};
