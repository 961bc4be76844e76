use thiserror::Error;

use crate::http::headers::HeaderMap;
use crate::http::request::{Method, Request};

/// The header block terminator.
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no bytes received")]
    Empty,
    #[error("request line must have exactly three tokens")]
    InvalidRequestLine,
    #[error("status line carries no numeric status code")]
    InvalidStatusLine,
}

/// A response as seen by the client.
#[derive(Debug, Clone)]
pub struct ParsedResponse {
    pub status: u16,
    /// Lower-cased keys; the last duplicate on the wire wins.
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Position of the first `\r\n\r\n` in `buf`, if any.
pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
}

/// Parses a request out of whatever was accumulated on the connection.
///
/// The body is everything after the terminator, untouched. If the peer closed
/// before sending a terminator the whole buffer is treated as the header block.
pub fn parse_http_request(buf: &[u8]) -> Result<Request, ParseError> {
    if buf.is_empty() {
        return Err(ParseError::Empty);
    }

    let (head, body) = split_message(buf);
    let (start_line, headers) = parse_head(&head);

    let parts: Vec<&str> = start_line.split_whitespace().collect();
    let [method, path, version] = parts[..] else {
        return Err(ParseError::InvalidRequestLine);
    };

    Ok(Request {
        method: Method::parse(method),
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body: body.to_vec(),
    })
}

/// Parses a complete response read until the server closed the connection.
pub fn parse_http_response(buf: &[u8]) -> Result<ParsedResponse, ParseError> {
    if buf.is_empty() {
        return Err(ParseError::Empty);
    }

    let (head, body) = split_message(buf);
    let (status_line, headers) = parse_head(&head);

    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or(ParseError::InvalidStatusLine)?;

    Ok(ParsedResponse {
        status,
        headers,
        body: body.to_vec(),
    })
}

fn split_message(buf: &[u8]) -> (String, &[u8]) {
    let (head, body) = match find_headers_end(buf) {
        Some(end) => (&buf[..end], &buf[end + HEADER_TERMINATOR.len()..]),
        None => (buf, &[][..]),
    };

    (String::from_utf8_lossy(head).into_owned(), body)
}

fn parse_head(head: &str) -> (&str, HeaderMap) {
    let mut lines = head.split("\r\n");
    let start_line = lines.next().unwrap_or_default();

    let mut headers = HeaderMap::new();
    for line in lines {
        // Lines without a colon are not fields; skip them.
        if let Some((key, value)) = line.split_once(':') {
            headers.insert(key.trim().to_ascii_lowercase(), value.trim());
        }
    }

    (start_line, headers)
}
