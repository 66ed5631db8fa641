pub mod controller;
pub mod gate;
pub mod model;
pub mod router;
pub mod service;
