//! Listening sockets and the two ways of driving their connections.

pub mod listener;
pub mod multiplexed;
pub mod sequential;

pub use listener::{bind, run, serve};
pub use multiplexed::Multiplexer;
