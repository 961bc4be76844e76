//! Minimal HTTP/1.0 client: URL splitting and redirect-following GET.

pub mod fetch;
pub mod url;

pub use fetch::{FetchError, FetchOutcome, Fetcher, MAX_REDIRECTS};
pub use url::{HttpUrl, UrlError};
