use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("cannot build request paths on {0}")]
    BaseUrl(String),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
}
