//! Page and product extraction.
//!
//! A single URL is fetched with GET against `base_url + url` (appended verbatim,
//! no encoding). Several URLs are POSTed as a JSON array to the bare base URL.

use contextforce_core::Error;
use serde::Serialize;

use crate::client::ApiClient;
use crate::format::ResultFormat;
use crate::headers::{CF_INCLUDE_IMAGES, CF_INCLUDE_LINKS, CF_INCLUDE_REVIEWS, RequestHeaders};
use crate::response::ApiResponse;

/// One target URL or an ordered batch of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Urls {
    Single(String),
    Many(Vec<String>),
}

impl From<&str> for Urls {
    fn from(url: &str) -> Self {
        Urls::Single(url.to_string())
    }
}

impl From<String> for Urls {
    fn from(url: String) -> Self {
        Urls::Single(url)
    }
}

impl From<Vec<String>> for Urls {
    fn from(urls: Vec<String>) -> Self {
        Urls::Many(urls)
    }
}

impl From<Vec<&str>> for Urls {
    fn from(urls: Vec<&str>) -> Self {
        Urls::Many(urls.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Urls {
    fn from(urls: &[&str]) -> Self {
        Urls::Many(urls.iter().map(|u| u.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Urls {
    fn from(urls: [&str; N]) -> Self {
        Urls::Many(urls.iter().map(|u| u.to_string()).collect())
    }
}

/// Options for [`ApiClient::extract_content`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentOptions {
    /// Result format (default: Markdown).
    pub result_format: ResultFormat,
    /// Keep hyperlinks in the extracted content (default: false).
    pub include_links: bool,
    /// Keep images in the extracted content (default: false).
    pub include_images: bool,
}

impl Default for ContentOptions {
    fn default() -> Self {
        Self { result_format: ResultFormat::Markdown, include_links: false, include_images: false }
    }
}

impl ContentOptions {
    pub(crate) fn headers(&self) -> RequestHeaders {
        RequestHeaders::new()
            .accept_json(self.result_format.is_json())
            .flag(CF_INCLUDE_LINKS, self.include_links)
            .flag(CF_INCLUDE_IMAGES, self.include_images)
    }
}

/// Options for [`ApiClient::extract_product`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductOptions {
    /// Result format (default: JSON).
    pub result_format: ResultFormat,
    /// Include customer reviews (default: false).
    pub include_reviews: bool,
}

impl Default for ProductOptions {
    fn default() -> Self {
        Self { result_format: ResultFormat::Json, include_reviews: false }
    }
}

impl ProductOptions {
    pub(crate) fn headers(&self) -> RequestHeaders {
        RequestHeaders::new()
            .accept_json(self.result_format.is_json())
            .flag(CF_INCLUDE_REVIEWS, self.include_reviews)
    }
}

impl ApiClient {
    /// Extract readable content from one or more web pages.
    pub async fn extract_content(&self, urls: impl Into<Urls>, options: &ContentOptions) -> Result<ApiResponse, Error> {
        self.dispatch_urls(urls.into(), options.headers()).await
    }

    /// Extract structured product data from one or more product pages.
    pub async fn extract_product(&self, urls: impl Into<Urls>, options: &ProductOptions) -> Result<ApiResponse, Error> {
        self.dispatch_urls(urls.into(), options.headers()).await
    }

    async fn dispatch_urls(&self, urls: Urls, headers: RequestHeaders) -> Result<ApiResponse, Error> {
        match urls {
            Urls::Single(url) => self.get(&self.base_target(&url), headers).await,
            Urls::Many(urls) => self.post_json(&self.base_target(""), &urls, headers).await,
        }
    }
}
