//! Command implementations for the flashgen CLI

pub mod config;
pub mod doctor;
pub mod generate;
pub mod models;

pub use config::*;
pub use doctor::*;
pub use generate::*;
pub use models::*;
