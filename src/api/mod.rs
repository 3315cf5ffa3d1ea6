//! Messages API client for commit message generation.

pub mod client;
pub mod config;
pub mod wire;

pub use client::{INVALID_RESPONSE_SENTINEL, parse_response, request_completion};
pub use config::ApiConfig;
