//! Search-engine results pages fetched through the search proxy.

use contextforce_core::Error;

use crate::client::ApiClient;
use crate::format::ResultFormat;
use crate::headers::{CF_FOLLOW_LINKS, CF_TOP_N, RequestHeaders};
use crate::response::ApiResponse;

/// Search engines with a built-in URL template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchEngine {
    Google,
    Amazon,
    YouTube,
}

impl SearchEngine {
    /// Results-page URL prefix; the encoded query is appended to it.
    pub fn template(self) -> &'static str {
        match self {
            SearchEngine::Google => "https://www.google.com/search?q=",
            SearchEngine::Amazon => "https://www.amazon.com/s?k=",
            SearchEngine::YouTube => "https://www.youtube.com/results?search_query=",
        }
    }

    /// Results-page URL for `query`.
    pub fn search_url(self, query: &str) -> String {
        format!("{}{}", self.template(), encode_query(query))
    }
}

/// Encode a query-string component in `application/x-www-form-urlencoded` form
/// (space becomes `+`).
pub fn encode_query(query: &str) -> String {
    url::form_urlencoded::byte_serialize(query.as_bytes()).collect()
}

/// Options shared by every search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Result format (default: JSON).
    pub result_format: ResultFormat,
    /// Fetch and extract the top result pages too (default: true).
    pub follow_links: bool,
    /// Number of result pages to follow; only sent with `follow_links` (default: 5).
    pub top_n: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { result_format: ResultFormat::Json, follow_links: true, top_n: 5 }
    }
}

impl SearchOptions {
    pub(crate) fn headers(&self) -> Result<RequestHeaders, Error> {
        let headers = RequestHeaders::new()
            .accept_json(self.result_format.is_json())
            .flag(CF_FOLLOW_LINKS, self.follow_links);
        if self.follow_links { headers.text(CF_TOP_N, &self.top_n.to_string()) } else { Ok(headers) }
    }
}

impl ApiClient {
    /// Fetch an arbitrary search-engine URL through the search proxy.
    ///
    /// `search_url` is appended verbatim to the search base URL.
    pub async fn search(&self, search_url: &str, options: &SearchOptions) -> Result<ApiResponse, Error> {
        tracing::debug!(search_url, "searching via proxy");
        self.get(&self.search_target(search_url), options.headers()?).await
    }

    /// Search `engine` for `query`.
    pub async fn search_engine(
        &self, engine: SearchEngine, query: &str, options: &SearchOptions,
    ) -> Result<ApiResponse, Error> {
        self.search(&engine.search_url(query), options).await
    }

    pub async fn search_google(&self, query: &str, options: &SearchOptions) -> Result<ApiResponse, Error> {
        self.search_engine(SearchEngine::Google, query, options).await
    }

    pub async fn search_amazon(&self, query: &str, options: &SearchOptions) -> Result<ApiResponse, Error> {
        self.search_engine(SearchEngine::Amazon, query, options).await
    }

    pub async fn search_youtube(&self, query: &str, options: &SearchOptions) -> Result<ApiResponse, Error> {
        self.search_engine(SearchEngine::YouTube, query, options).await
    }
}
