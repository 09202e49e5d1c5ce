#[allow(clippy::module_inception)]
mod client;
mod error;

pub use client::{ApiClient, RawResponse};
pub use error::ApiError;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

pub trait ApiRequest {
    type Response: DeserializeOwned;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError>;
}

/// `base_url` with its path replaced by `prefix` followed by the segments
///  of a tree path. The root path keeps a trailing slash (`/file/`).
pub(crate) fn tree_url(base_url: &Url, prefix: &[&str], path: &str) -> Result<Url, ApiError> {
    let mut url = base_url.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| ApiError::BaseUrl(base_url.to_string()))?;
        segments.clear().extend(prefix);
        let mut parts = path.split('/').filter(|s| !s.is_empty()).peekable();
        if parts.peek().is_none() {
            segments.push("");
        }
        segments.extend(parts);
    }
    Ok(url)
}
