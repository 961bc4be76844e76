//! Lantern - HTTP/1.0 file server, JSON product server and fetch client
//!
//! Core library shared by the `lantern-*` binaries.

pub mod cli;
pub mod client;
pub mod config;
pub mod handler;
pub mod http;
pub mod logging;
pub mod server;
