use std::fmt;

use crate::http::headers::HeaderMap;

/// HTTP request methods.
///
/// Only `GET` is served by the file handlers. Every other token is still carried
/// through parsing so the handler can answer it with 403 Forbidden instead of
/// treating the request as malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    Get,
    /// POST - Create or submit data
    Post,
    /// PUT - Replace a resource
    Put,
    /// DELETE - Delete a resource
    Delete,
    /// HEAD - Like GET but without the response body
    Head,
    /// Any other token from the request line, kept verbatim
    Other(String),
}

/// Represents a parsed HTTP request from a client.
///
/// Contains all information extracted from the HTTP request line and headers.
/// Header names are lower-cased by the parser; lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The request target as sent, query string included (e.g. "/product?a=2")
    pub path: String,
    /// HTTP version token (e.g. "HTTP/1.0")
    pub version: String,
    pub headers: HeaderMap,
    /// Whatever followed the header terminator in the same read
    pub body: Vec<u8>,
}

impl Method {
    /// Parses an HTTP method token. Matching is case-sensitive, so `get` is an
    /// extension method rather than `GET`.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::Get);
    /// assert_eq!(Method::parse("get"), Method::Other("get".to_string()));
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "HEAD" => Method::Head,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Other(token) => token,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Request {
    /// An `HTTP/1.0` request with no headers and an empty body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            version: "HTTP/1.0".to_string(),
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Retrieves a header value by name, ignoring case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// Splits the request target at the first `?`.
    ///
    /// Returns the bare path and the query string (empty when absent).
    pub fn path_and_query(&self) -> (&str, &str) {
        self.path.split_once('?').unwrap_or((self.path.as_str(), ""))
    }

    /// Serializes the request line, headers and body into wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        buf.extend_from_slice(
            format!("{} {} {}\r\n", self.method, self.path, self.version).as_bytes(),
        );

        for (key, value) in self.headers.iter() {
            buf.extend_from_slice(format!("{}: {}\r\n", key, value).as_bytes());
        }

        buf.extend_from_slice(b"\r\n");
        buf.extend_from_slice(&self.body);

        buf
    }
}
