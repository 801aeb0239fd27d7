pub mod checks;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod legacy;
pub mod models;
pub mod pipeline;
pub mod render;

pub use error::{Result, SessionError};
