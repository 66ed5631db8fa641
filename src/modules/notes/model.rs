pub use vibeflix_models::notes::*;
