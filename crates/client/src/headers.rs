//! Request header names and composition helpers.
//!
//! Every service-specific header carries the `CF-` prefix. Header names are
//! case-insensitive on the wire, so they are declared lowercase here.

use contextforce_core::Error;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};

pub const CF_INCLUDE_LINKS: HeaderName = HeaderName::from_static("cf-include-links");
pub const CF_INCLUDE_IMAGES: HeaderName = HeaderName::from_static("cf-include-images");
pub const CF_INCLUDE_REVIEWS: HeaderName = HeaderName::from_static("cf-include-reviews");
pub const CF_RESULT_FORMAT: HeaderName = HeaderName::from_static("cf-result-format");
pub const CF_MODE: HeaderName = HeaderName::from_static("cf-mode");
pub const CF_PAGE_NUMBER: HeaderName = HeaderName::from_static("cf-page-number");
pub const CF_MODEL: HeaderName = HeaderName::from_static("cf-model");
pub const CF_OPENAI_API_KEY: HeaderName = HeaderName::from_static("cf-openai-api-key");
pub const CF_ANTHROPIC_API_KEY: HeaderName = HeaderName::from_static("cf-anthropic-api-key");
pub const CF_GEMINI_API_KEY: HeaderName = HeaderName::from_static("cf-gemini-api-key");
pub const CF_FOLLOW_LINKS: HeaderName = HeaderName::from_static("cf-follow-links");
pub const CF_TOP_N: HeaderName = HeaderName::from_static("cf-top-n");

/// Per-call headers merged over the client's default headers.
#[derive(Debug, Clone, Default)]
pub(crate) struct RequestHeaders(HeaderMap);

impl RequestHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `Accept: application/json` when `json` is set.
    pub fn accept_json(mut self, json: bool) -> Self {
        if json {
            self.0.insert(ACCEPT, HeaderValue::from_static("application/json"));
        }
        self
    }

    /// Adds `name: true` when `enabled` is set.
    pub fn flag(mut self, name: HeaderName, enabled: bool) -> Self {
        if enabled {
            self.0.insert(name, HeaderValue::from_static("true"));
        }
        self
    }

    /// Adds a header with an arbitrary value.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if the value contains characters not allowed in a header.
    pub fn text(mut self, name: HeaderName, value: &str) -> Result<Self, Error> {
        let value = HeaderValue::from_str(value)
            .map_err(|_| Error::Validation(format!("value for header '{name}' contains invalid characters")))?;
        self.0.insert(name, value);
        Ok(self)
    }

    /// Like [`RequestHeaders::text`], but the value is marked sensitive so it is
    /// redacted from `Debug` output.
    pub fn secret(mut self, name: HeaderName, value: &str) -> Result<Self, Error> {
        let mut value = HeaderValue::from_str(value)
            .map_err(|_| Error::Validation(format!("value for header '{name}' contains invalid characters")))?;
        value.set_sensitive(true);
        self.0.insert(name, value);
        Ok(self)
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|v| v.to_str().ok())
    }

    #[cfg(test)]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> HeaderMap {
        self.0
    }
}

/// Merge per-call headers over defaults. Per-call values win on conflict.
pub(crate) fn merge(defaults: &HeaderMap, overrides: HeaderMap) -> HeaderMap {
    let mut merged = defaults.clone();
    let mut last_name = None;
    for (name, value) in overrides {
        match name {
            Some(name) => {
                merged.insert(name.clone(), value);
                last_name = Some(name);
            }
            None => {
                if let Some(name) = &last_name {
                    merged.append(name.clone(), value);
                }
            }
        }
    }
    merged
}
