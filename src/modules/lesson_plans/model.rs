pub use vibeflix_models::lesson_plans::*;
