//! GET with bounded redirect following.
//!
//! Every hop opens a fresh connection, sends `Connection: close` and reads until
//! the server closes; the body is never delimited by `Content-Length`.

use bytes::BytesMut;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::client::url::{HTTP_SCHEME, HTTPS_SCHEME, HttpUrl, UrlError};
use crate::http::parser::{ParseError, ParsedResponse, parse_http_response};
use crate::http::request::{Method, Request};

/// Redirects followed before giving up.
pub const MAX_REDIRECTS: usize = 10;

const BUFFER_SIZE: usize = 4096;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Too many redirects")]
    TooManyRedirects,
    #[error("URL must start with http://, got {0:?}")]
    UnsupportedScheme(String),
    #[error("Invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: UrlError,
    },
    #[error("Failed to connect to {authority}: {source}")]
    Connect {
        authority: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Connection to {authority} failed: {source}")]
    Transport {
        authority: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid response: {0}")]
    InvalidResponse(#[from] ParseError),
    #[error("Redirect without location header")]
    MissingLocation,
    #[error("HTTPS is not supported, redirected to {0}")]
    HttpsRedirect(String),
    #[error("HTTP {0}")]
    UnexpectedStatus(u16),
    #[error("Invalid content-type: {0:?}")]
    InvalidContentType(String),
}

/// A fetch that ran to a terminal response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 200 with an HTML content type.
    Success(Vec<u8>),
    /// Any status of 400 or above; the body is still reported.
    ErrorStatus { status: u16, body: Vec<u8> },
}

impl FetchOutcome {
    pub fn body(&self) -> &[u8] {
        match self {
            FetchOutcome::Success(body) => body,
            FetchOutcome::ErrorStatus { body, .. } => body,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }
}

#[derive(Debug, Clone)]
pub struct Fetcher {
    max_redirects: usize,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    pub fn new() -> Self {
        Self {
            max_redirects: MAX_REDIRECTS,
        }
    }

    pub fn with_max_redirects(max_redirects: usize) -> Self {
        Self { max_redirects }
    }

    /// Fetches `url`, following 301/302 until a terminal response.
    ///
    /// Reaching `max_redirects` followed redirects is fatal, as is a redirect to
    /// an `https://` location, which is rejected before any connection attempt.
    pub async fn fetch(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        let mut current = url.to_string();
        let mut hops = 0;

        loop {
            if hops == self.max_redirects {
                return Err(FetchError::TooManyRedirects);
            }
            if !current.starts_with(HTTP_SCHEME) {
                return Err(FetchError::UnsupportedScheme(current));
            }

            let target = HttpUrl::parse(&current).map_err(|source| FetchError::InvalidUrl {
                url: current.clone(),
                source,
            })?;
            let response = self.get(&target).await?;
            debug!(url = %current, status = response.status, hops, "Response received");

            match response.status {
                301 | 302 => {
                    let location = response
                        .headers
                        .get("location")
                        .filter(|l| !l.is_empty())
                        .ok_or(FetchError::MissingLocation)?;
                    info!(location, "Redirected to: {}", location);

                    if location.starts_with(HTTPS_SCHEME) {
                        return Err(FetchError::HttpsRedirect(location.to_string()));
                    }

                    current = location.to_string();
                    hops += 1;
                }
                status if status >= 400 => {
                    return Ok(FetchOutcome::ErrorStatus {
                        status,
                        body: response.body,
                    });
                }
                200 => {
                    let content_type = response.headers.get("content-type").unwrap_or_default();
                    if !content_type.starts_with("text/html") {
                        return Err(FetchError::InvalidContentType(content_type.to_string()));
                    }
                    return Ok(FetchOutcome::Success(response.body));
                }
                status => return Err(FetchError::UnexpectedStatus(status)),
            }
        }
    }

    async fn get(&self, target: &HttpUrl) -> Result<ParsedResponse, FetchError> {
        let authority = target.authority();
        let mut stream = TcpStream::connect(&authority)
            .await
            .map_err(|source| FetchError::Connect {
                authority: authority.clone(),
                source,
            })?;

        let raw = exchange(&mut stream, &build_get_request(target))
            .await
            .map_err(|source| FetchError::Transport { authority, source })?;

        Ok(parse_http_response(&raw)?)
    }
}

/// The request sent for every hop.
pub fn build_get_request(target: &HttpUrl) -> Request {
    let mut request = Request::new(Method::Get, target.path.as_str());
    request.headers.insert("Host", target.host.as_str());
    request.headers.insert("Connection", "close");
    request
}

async fn exchange(stream: &mut TcpStream, request: &Request) -> std::io::Result<BytesMut> {
    stream.write_all(&request.to_bytes()).await?;
    stream.flush().await?;

    let mut buffer = BytesMut::with_capacity(BUFFER_SIZE);
    loop {
        buffer.reserve(BUFFER_SIZE);
        if stream.read_buf(&mut buffer).await? == 0 {
            return Ok(buffer);
        }
    }
}
