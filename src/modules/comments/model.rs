pub use vibeflix_models::comments::*;
