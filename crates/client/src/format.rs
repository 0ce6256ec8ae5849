//! Requested result format.

use std::fmt;
use std::str::FromStr;

use contextforce_core::Error;
use serde::{Deserialize, Serialize};

/// Format the service should return.
///
/// Only `Json` changes the request: it adds `Accept: application/json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultFormat {
    Json,
    Markdown,
}

impl ResultFormat {
    pub const ALL: [ResultFormat; 2] = [ResultFormat::Json, ResultFormat::Markdown];

    pub fn as_str(self) -> &'static str {
        match self {
            ResultFormat::Json => "json",
            ResultFormat::Markdown => "markdown",
        }
    }

    pub fn is_json(self) -> bool {
        self == ResultFormat::Json
    }
}

impl fmt::Display for ResultFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| Error::Validation(format!("invalid result format '{s}': must be one of [json, markdown]")))
    }
}
