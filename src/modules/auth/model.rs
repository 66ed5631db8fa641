//! Authentication payloads, re-exported from `vibeflix-models`.

pub use vibeflix_models::auth::*;
pub use vibeflix_models::users::User;
