//! Client for the ContextForce extraction and search API.
//!
//! This crate builds requests for the remote service (header composition, URL
//! concatenation, multipart uploads) and normalizes responses into
//! [`ApiResponse`]. Configuration and errors live in `contextforce-core`.

pub mod client;
pub mod extract;
pub mod format;
pub mod headers;
pub mod pdf;
pub mod response;
pub mod search;

pub use client::ApiClient;
pub use extract::{ContentOptions, ProductOptions, Urls};
pub use format::ResultFormat;
pub use pdf::{LlmModel, PdfMode, PdfOptions, Provider};
pub use response::ApiResponse;
pub use search::{SearchEngine, SearchOptions, encode_query};

pub use contextforce_core::{ClientConfig, ConfigError, Error};
