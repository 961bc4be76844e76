//! HTTP/1.0 message handling.
//!
//! # Architecture
//!
//! - **`headers`**: ordered, case-insensitive header map
//! - **`parser`**: frames requests and responses on the `\r\n\r\n` terminator
//! - **`request`**: request representation, builder and serialization
//! - **`response`**: status table and response builder
//! - **`writer`**: writes a response in bounded chunks
//! - **`connection`**: drives one connection from first byte to close
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Accumulate bytes until \r\n\r\n or EOF
//!        └──────┬──────┘
//!               │ Request parsed          (EOF / malformed → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Handler produces the response
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response, errors swallowed
//!        └──────┬───────────┘
//!               ▼
//!            Closed            ← Always, despite "Connection: Keep-Alive"
//! ```

pub mod connection;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
