pub use vibeflix_models::courses::*;
