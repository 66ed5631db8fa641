pub use vibeflix_models::completions::{CompletionResponse, LessonCompletion};
pub use vibeflix_models::lessons::*;
