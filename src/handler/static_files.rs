//! Static file serving.
//!
//! Request paths map onto files under a document root. The checks run in a fixed
//! order: the target must be an existing regular file (else 404), then its name
//! must carry an allowed extension (else 403). Only then is the file read.

use std::path::PathBuf;

use tracing::debug;

use crate::config::StaticFilesConfig;
use crate::handler::Handler;
use crate::http::request::{Method, Request};
use crate::http::response::Response;

/// Outcome of resolving a request path against the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileServeResult {
    Ok(Vec<u8>),
    NotFound,
    Forbidden,
}

#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    index: Option<String>,
    extensions: Vec<String>,
}

impl StaticFiles {
    pub fn new(config: &StaticFilesConfig) -> Self {
        Self {
            root: config.root.clone(),
            index: config.index.clone(),
            extensions: config.extensions.clone(),
        }
    }

    /// The file name a request path refers to: one leading `/` removed, and the
    /// default document substituted for an empty name when one is configured.
    pub fn file_name<'a>(&'a self, request_path: &'a str) -> &'a str {
        let name = request_path.strip_prefix('/').unwrap_or(request_path);

        match (&self.index, name.is_empty()) {
            (Some(index), true) => index.as_str(),
            _ => name,
        }
    }

    fn allowed(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    pub async fn resolve(&self, request_path: &str) -> FileServeResult {
        let name = self.file_name(request_path);
        let path = self.root.join(name);

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            _ => return FileServeResult::NotFound,
        }

        if !self.allowed(name) {
            return FileServeResult::Forbidden;
        }

        match tokio::fs::read(&path).await {
            Ok(bytes) => FileServeResult::Ok(bytes),
            Err(e) => {
                // The file vanished or became unreadable after the check.
                debug!(path = %path.display(), error = %e, "File read failed");
                FileServeResult::NotFound
            }
        }
    }
}

impl Handler for StaticFiles {
    async fn handle(&self, request: &Request) -> Response {
        if request.method != Method::Get {
            return Response::method_forbidden();
        }

        match self.resolve(&request.path).await {
            FileServeResult::Ok(body) => Response::html(body),
            FileServeResult::NotFound => Response::not_found(),
            FileServeResult::Forbidden => Response::forbidden(),
        }
    }
}
