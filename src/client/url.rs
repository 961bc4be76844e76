use thiserror::Error;

pub const HTTP_SCHEME: &str = "http://";
pub const HTTPS_SCHEME: &str = "https://";

pub const DEFAULT_PORT: u16 = 80;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("URL must start with http://")]
    UnsupportedScheme,
    #[error("invalid port {0:?}")]
    InvalidPort(String),
}

/// Host, port and path of an absolute `http://` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpUrl {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl HttpUrl {
    /// Splits `http://host[:port][/path]`.
    ///
    /// The path always starts with `/` and loses a single trailing `/`
    /// (`http://a.com/x/` has path `/x`). The port comes from the text after the
    /// last `:` of the host part and defaults to 80. Nothing is percent-decoded
    /// and the query string stays in the path.
    pub fn parse(url: &str) -> Result<Self, UrlError> {
        let rest = url
            .strip_prefix(HTTP_SCHEME)
            .ok_or(UrlError::UnsupportedScheme)?;

        let (host_port, path) = match rest.split_once('/') {
            None => (rest, "/".to_string()),
            Some((host_port, "")) => (host_port, "/".to_string()),
            Some((host_port, tail)) => {
                let tail = tail.strip_suffix('/').unwrap_or(tail);
                (host_port, format!("/{}", tail))
            }
        };

        let (host, port) = match host_port.rsplit_once(':') {
            Some((host, port)) => (
                host,
                port.parse()
                    .map_err(|_| UrlError::InvalidPort(port.to_string()))?,
            ),
            None => (host_port, DEFAULT_PORT),
        };

        Ok(Self {
            host: host.to_string(),
            port,
            path,
        })
    }

    /// `host:port`, suitable for connecting.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(url: &str) -> (String, u16, String) {
        let parsed = HttpUrl::parse(url).unwrap();
        (parsed.host, parsed.port, parsed.path)
    }

    #[test]
    fn defaults_port_and_path() {
        assert_eq!(parts("http://a.com"), ("a.com".into(), 80, "/".into()));
        assert_eq!(parts("http://a.com/"), ("a.com".into(), 80, "/".into()));
    }

    #[test]
    fn strips_one_trailing_slash() {
        assert_eq!(parts("http://a.com:8080/x/"), ("a.com".into(), 8080, "/x".into()));
        assert_eq!(parts("http://a.com/a/b/"), ("a.com".into(), 80, "/a/b".into()));
        assert_eq!(parts("http://a.com/a//"), ("a.com".into(), 80, "/a/".into()));
    }
}
