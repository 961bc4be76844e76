//! Request handlers.
//!
//! A handler turns one parsed request into one response. Both server modes drive
//! the same handlers, so anything a handler does (including reading files) runs
//! on the connection loop itself.

pub mod product;
pub mod static_files;

use crate::http::request::Request;
use crate::http::response::Response;

pub use product::ProductHandler;
pub use static_files::{FileServeResult, StaticFiles};

#[allow(async_fn_in_trait)]
pub trait Handler {
    async fn handle(&self, request: &Request) -> Response;
}
