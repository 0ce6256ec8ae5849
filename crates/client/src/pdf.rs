//! PDF extraction.
//!
//! ### Validation (before any request)
//! - `auto` and `full-llm-ocr` modes need a model and at least one provider key.
//! - A chosen model needs its own provider's key.
//!
//! Provider keys resolve explicit value first, then `OPENAI_API_KEY`,
//! `ANTHROPIC_API_KEY` or `GEMINI_API_KEY`. Both checks above see the resolved keys.
//!
//! ### Dispatch
//! - `http://` / `https://` sources: GET `base_url + source`.
//! - Anything else is a local path, uploaded as multipart field `file`
//!   (`file.pdf`, `application/pdf`) to the bare base URL.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use contextforce_core::env::{ANTHROPIC_API_KEY, GEMINI_API_KEY, OPENAI_API_KEY};
use contextforce_core::{Error, resolve_with};
use reqwest::header::HeaderName;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::format::ResultFormat;
use crate::headers::{
    CF_ANTHROPIC_API_KEY, CF_GEMINI_API_KEY, CF_MODE, CF_MODEL, CF_OPENAI_API_KEY, CF_PAGE_NUMBER, CF_RESULT_FORMAT,
    RequestHeaders,
};
use crate::response::ApiResponse;

const UPLOAD_FIELD: &str = "file";
const UPLOAD_FILE_NAME: &str = "file.pdf";
const UPLOAD_MIME: &str = "application/pdf";

/// PDF extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PdfMode {
    /// Let the service decide between text extraction and LLM OCR.
    Auto,
    /// Text layer only.
    #[default]
    NoOcr,
    /// Every page goes through LLM OCR.
    FullLlmOcr,
}

impl PdfMode {
    pub const ALL: [PdfMode; 3] = [PdfMode::Auto, PdfMode::NoOcr, PdfMode::FullLlmOcr];

    pub fn as_str(self) -> &'static str {
        match self {
            PdfMode::Auto => "auto",
            PdfMode::NoOcr => "no-ocr",
            PdfMode::FullLlmOcr => "full-llm-ocr",
        }
    }

    /// Whether this mode calls out to an LLM provider.
    pub fn uses_llm(self) -> bool {
        matches!(self, PdfMode::Auto | PdfMode::FullLlmOcr)
    }
}

impl fmt::Display for PdfMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PdfMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| Error::Validation(format!("invalid mode '{s}': must be one of [auto, no-ocr, full-llm-ocr]")))
    }
}

/// LLM provider whose key the service forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAi,
    Anthropic,
    Gemini,
}

impl Provider {
    pub fn name(self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::Gemini => "Gemini",
        }
    }

    /// Environment variable consulted when no explicit key is given.
    pub fn env_var(self) -> &'static str {
        match self {
            Provider::OpenAi => OPENAI_API_KEY,
            Provider::Anthropic => ANTHROPIC_API_KEY,
            Provider::Gemini => GEMINI_API_KEY,
        }
    }

    pub fn header(self) -> HeaderName {
        match self {
            Provider::OpenAi => CF_OPENAI_API_KEY,
            Provider::Anthropic => CF_ANTHROPIC_API_KEY,
            Provider::Gemini => CF_GEMINI_API_KEY,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Models accepted for LLM-backed extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LlmModel {
    #[serde(rename = "gemini-1.5-flash-001")]
    Gemini15Flash001,
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "anthropic-sonnet-3.5")]
    AnthropicSonnet35,
}

impl LlmModel {
    pub const ALL: [LlmModel; 4] =
        [LlmModel::Gemini15Flash001, LlmModel::Gpt4oMini, LlmModel::Gpt4o, LlmModel::AnthropicSonnet35];

    pub fn as_str(self) -> &'static str {
        match self {
            LlmModel::Gemini15Flash001 => "gemini-1.5-flash-001",
            LlmModel::Gpt4oMini => "gpt-4o-mini",
            LlmModel::Gpt4o => "gpt-4o",
            LlmModel::AnthropicSonnet35 => "anthropic-sonnet-3.5",
        }
    }

    pub fn provider(self) -> Provider {
        match self {
            LlmModel::Gemini15Flash001 => Provider::Gemini,
            LlmModel::Gpt4oMini | LlmModel::Gpt4o => Provider::OpenAi,
            LlmModel::AnthropicSonnet35 => Provider::Anthropic,
        }
    }
}

impl fmt::Display for LlmModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|model| model.as_str() == s).ok_or_else(|| {
            Error::Validation(format!(
                "invalid LLM model '{s}': must be one of [gemini-1.5-flash-001, gpt-4o-mini, gpt-4o, anthropic-sonnet-3.5]"
            ))
        })
    }
}

/// Options for [`ApiClient::extract_pdf`].
#[derive(Clone, PartialEq, Eq)]
pub struct PdfOptions {
    /// Result format (default: Markdown).
    pub result_format: ResultFormat,
    /// Extraction strategy (default: no-ocr).
    pub mode: PdfMode,
    /// Pages to extract, passed through as given (e.g. `"1, 2"`).
    pub page_number: Option<String>,
    pub model: Option<LlmModel>,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            result_format: ResultFormat::Markdown,
            mode: PdfMode::NoOcr,
            page_number: None,
            model: None,
            openai_api_key: None,
            anthropic_api_key: None,
            gemini_api_key: None,
        }
    }
}

impl fmt::Debug for PdfOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "<redacted>");
        f.debug_struct("PdfOptions")
            .field("result_format", &self.result_format)
            .field("mode", &self.mode)
            .field("page_number", &self.page_number)
            .field("model", &self.model)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .finish()
    }
}

/// Provider keys after explicit-then-environment resolution.
struct ProviderKeys {
    openai: Option<String>,
    anthropic: Option<String>,
    gemini: Option<String>,
}

impl ProviderKeys {
    fn resolve<F>(options: &PdfOptions, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            openai: resolve_with(options.openai_api_key.as_deref(), OPENAI_API_KEY, &lookup),
            anthropic: resolve_with(options.anthropic_api_key.as_deref(), ANTHROPIC_API_KEY, &lookup),
            gemini: resolve_with(options.gemini_api_key.as_deref(), GEMINI_API_KEY, &lookup),
        }
    }

    fn get(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::OpenAi => self.openai.as_deref(),
            Provider::Anthropic => self.anthropic.as_deref(),
            Provider::Gemini => self.gemini.as_deref(),
        }
    }

    fn any(&self) -> bool {
        self.openai.is_some() || self.anthropic.is_some() || self.gemini.is_some()
    }
}

impl PdfOptions {
    /// Check the option combination without sending anything.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if an LLM mode lacks a model or any provider key,
    /// or if the chosen model's provider key is missing.
    pub fn validate(&self) -> Result<(), Error> {
        self.headers_with(|name| std::env::var(name).ok()).map(|_| ())
    }

    pub(crate) fn headers(&self) -> Result<RequestHeaders, Error> {
        self.headers_with(|name| std::env::var(name).ok())
    }

    fn headers_with<F>(&self, lookup: F) -> Result<RequestHeaders, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let keys = ProviderKeys::resolve(self, lookup);
        self.check(&keys)?;

        let mut headers = RequestHeaders::new()
            .text(CF_RESULT_FORMAT, self.result_format.as_str())?
            .accept_json(self.result_format.is_json())
            .text(CF_MODE, self.mode.as_str())?;

        if let Some(pages) = self.page_number.as_deref().filter(|p| !p.is_empty()) {
            headers = headers.text(CF_PAGE_NUMBER, pages)?;
        }

        if let Some(model) = self.model {
            let provider = model.provider();
            if let Some(key) = keys.get(provider) {
                headers = headers.secret(provider.header(), key)?;
            }
            headers = headers.text(CF_MODEL, model.as_str())?;
        }

        Ok(headers)
    }

    fn check(&self, keys: &ProviderKeys) -> Result<(), Error> {
        if self.mode.uses_llm() && (self.model.is_none() || !keys.any()) {
            return Err(Error::Validation(format!(
                "an LLM model and at least one provider API key are required for '{}' mode",
                self.mode
            )));
        }

        if let Some(model) = self.model {
            let provider = model.provider();
            if keys.get(provider).is_none() {
                return Err(Error::Validation(format!(
                    "{provider} API key must be provided for '{model}' model (pass it explicitly or set {})",
                    provider.env_var()
                )));
            }
        }

        Ok(())
    }
}

/// Whether a PDF source refers to a remote document rather than a local file.
pub fn is_remote_source(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

impl ApiClient {
    /// Extract content from a PDF given as a URL or a local file path.
    ///
    /// # Errors
    ///
    /// - `Error::Validation` for an invalid option combination (nothing is sent)
    /// - `Error::Io` if the local file cannot be read
    /// - `Error::Http` for non-2xx responses
    pub async fn extract_pdf(&self, pdf_source: &str, options: &PdfOptions) -> Result<ApiResponse, Error> {
        let headers = options.headers()?;

        if is_remote_source(pdf_source) {
            return self.get(&self.base_target(pdf_source), headers).await;
        }

        let bytes = tokio::fs::read(pdf_source)
            .await
            .map_err(|source| Error::Io { path: PathBuf::from(pdf_source), source })?;
        tracing::debug!(path = pdf_source, bytes = bytes.len(), "uploading local PDF");

        let part = Part::bytes(bytes)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(UPLOAD_MIME)
            .map_err(|e| Error::Validation(e.to_string()))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        self.post_multipart(&self.base_target(""), form, headers).await
    }
}
