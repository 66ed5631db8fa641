pub use vibeflix_models::enrollments::*;
