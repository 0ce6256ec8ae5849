//! Response normalization.
//!
//! The service answers either with JSON or with text (usually Markdown). The
//! declared `Content-Type` decides which: anything containing
//! `application/json` is parsed, everything else is returned verbatim.

use contextforce_core::Error;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A normalized service response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiResponse {
    /// Parsed JSON body (object, array, or scalar).
    Json(Value),
    /// Raw text body.
    Text(String),
}

impl ApiResponse {
    /// Normalize a successful response body by its declared content type.
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` if the content type claims JSON but the body does not parse.
    pub fn from_body(content_type: Option<&str>, body: String) -> Result<Self, Error> {
        if is_json_content_type(content_type) {
            tracing::debug!(bytes = body.len(), "decoding JSON response");
            let value = serde_json::from_str(&body).map_err(|e| Error::Decode(format!("invalid JSON body: {e}")))?;
            Ok(ApiResponse::Json(value))
        } else {
            tracing::debug!(content_type, bytes = body.len(), "returning text response");
            Ok(ApiResponse::Text(body))
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, ApiResponse::Json(_))
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            ApiResponse::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ApiResponse::Text(text) => Some(text),
            ApiResponse::Json(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            ApiResponse::Text(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            ApiResponse::Text(text) => Some(text),
            ApiResponse::Json(_) => None,
        }
    }

    /// Decode a JSON response into a caller-defined type.
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` for text responses or when the JSON does not match `T`.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, Error> {
        match self {
            ApiResponse::Json(value) => Ok(serde_json::from_value(value)?),
            ApiResponse::Text(_) => Err(Error::Decode("expected a JSON response, got text".into())),
        }
    }
}

fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_json_content_type_is_parsed() {
        let response = ApiResponse::from_body(Some("application/json"), r#"{"a":1}"#.into()).unwrap();
        assert_eq!(response, ApiResponse::Json(json!({"a": 1})));
    }

    #[test]
    fn test_json_with_charset_is_parsed() {
        let response = ApiResponse::from_body(Some("application/json; charset=utf-8"), "[1,2]".into()).unwrap();
        assert_eq!(response.as_json(), Some(&json!([1, 2])));
    }

    #[test]
    fn test_markdown_is_text() {
        let response = ApiResponse::from_body(Some("text/markdown"), "# hi".into()).unwrap();
        assert_eq!(response, ApiResponse::Text("# hi".into()));
        assert_eq!(response.as_text(), Some("# hi"));
    }

    #[test]
    fn test_missing_content_type_is_text() {
        let response = ApiResponse::from_body(None, r#"{"a":1}"#.into()).unwrap();
        assert_eq!(response.into_text().as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let result = ApiResponse::from_body(Some("application/json"), "<html>".into());
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_typed_deserialize() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Page {
            title: String,
        }

        let response = ApiResponse::Json(json!({"title": "Example", "extra": true}));
        let page: Page = response.deserialize().unwrap();
        assert_eq!(page, Page { title: "Example".into() });

        let text = ApiResponse::Text("# Example".into());
        assert!(matches!(text.deserialize::<Page>(), Err(Error::Decode(_))));
    }

    #[test]
    fn test_serializes_untagged() {
        assert_eq!(serde_json::to_string(&ApiResponse::Text("x".into())).unwrap(), "\"x\"");
        assert_eq!(serde_json::to_string(&ApiResponse::Json(json!({"a": 1}))).unwrap(), r#"{"a":1}"#);
    }
}
