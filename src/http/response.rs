use crate::http::headers::HeaderMap;

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=UTF-8";
pub const JSON_CONTENT_TYPE: &str = "application/json";

const NOT_FOUND_PAGE: &[u8] = b"<html><body><h1>404 Not Found</h1></body></html>\n";
const FORBIDDEN_PAGE: &[u8] = b"<html><body><h1>403 Forbidden</h1></body></html>\n";

/// HTTP status codes the servers can emit.
///
/// New codes are added as variants plus an arm in each mapping below; nothing else
/// in the crate branches on numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::Forbidden.reason_phrase(), "Forbidden");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "application/json")
///     .body(b"{}".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// Adds `Content-Length` from the body size unless one was set explicitly.
    pub fn build(mut self) -> Response {
        if !self.headers.contains_key("Content-Length") {
            self.headers
                .insert("Content-Length", self.body.len().to_string());
        }

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// A server response with the headers every reply carries.
    ///
    /// `Connection: Keep-Alive` is advertised, but the servers always close the
    /// connection after one response.
    pub fn with_content_type(status: StatusCode, content_type: &str, body: Vec<u8>) -> Self {
        ResponseBuilder::new(status)
            .header("Content-Type", content_type)
            .header("Content-Length", body.len().to_string())
            .header("Connection", "Keep-Alive")
            .body(body)
            .build()
    }

    /// 200 OK carrying an HTML document.
    pub fn html(body: impl Into<Vec<u8>>) -> Self {
        Self::with_content_type(StatusCode::Ok, HTML_CONTENT_TYPE, body.into())
    }

    pub fn json(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self::with_content_type(status, JSON_CONTENT_TYPE, body.into())
    }

    /// 404 with the stock HTML page.
    pub fn not_found() -> Self {
        Self::with_content_type(StatusCode::NotFound, HTML_CONTENT_TYPE, NOT_FOUND_PAGE.to_vec())
    }

    /// 403 with the stock HTML page, used for disallowed file types.
    pub fn forbidden() -> Self {
        Self::with_content_type(StatusCode::Forbidden, HTML_CONTENT_TYPE, FORBIDDEN_PAGE.to_vec())
    }

    /// 403 with an empty body, used for methods other than GET.
    pub fn method_forbidden() -> Self {
        Self::with_content_type(StatusCode::Forbidden, HTML_CONTENT_TYPE, Vec::new())
    }
}
