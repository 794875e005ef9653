pub mod controller;
pub mod log;
pub mod projector;
