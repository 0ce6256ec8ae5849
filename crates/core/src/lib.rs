//! Core types and shared functionality for the ContextForce client.
//!
//! This crate provides:
//! - Unified error types
//! - Layered client configuration
//! - Environment variable resolution for API keys

pub mod config;
pub mod env;
pub mod error;

pub use config::{ClientConfig, ConfigError};
pub use env::{resolve, resolve_with};
pub use error::Error;
