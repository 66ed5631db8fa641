//! # Vibeflix Config
//!
//! Configuration structures loaded once from environment variables:
//!
//! - [`jwt`]: session token secret, lifetime and cookie flags
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: listen addresses for the API and the metrics exporter
//!
//! # Example
//!
//! ```ignore
//! use vibeflix_config::{CorsConfig, JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod server;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;
