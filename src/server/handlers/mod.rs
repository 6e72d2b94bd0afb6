//! HTTP request handlers

mod ask;
mod health;

pub use ask::{ask_handler, AskRequest, AskResponse, ErrorResponse};
pub use health::{health_handler, HealthResponse};
