use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::handler::Handler;
use crate::http::parser::{find_headers_end, parse_http_request};
use crate::http::request::Request;
use crate::http::writer::ResponseWriter;

const READ_CHUNK: usize = 4096;

/// One client connection, driven from first byte to close.
///
/// Exactly one request is answered per connection. The response advertises
/// `Connection: Keep-Alive`, but the connection is closed once it has been sent.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self::resume(stream, BytesMut::with_capacity(READ_CHUNK))
    }

    /// Picks up a connection whose first bytes were already read elsewhere.
    pub fn resume(stream: S, buffer: BytesMut) -> Self {
        Self {
            stream,
            buffer,
            state: ConnectionState::Reading,
        }
    }

    pub async fn run<H: Handler>(&mut self, handler: &H) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Some(req) => ConnectionState::Processing(req),
                        None => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = handler.handle(req).await;
                    debug!(
                        method = %req.method,
                        path = %req.path,
                        status = response.status.as_u16(),
                        "Request handled"
                    );

                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(writer) => {
                    // A peer that went away mid-response is not our problem.
                    if let Err(e) = writer.write_to_stream(&mut self.stream).await {
                        debug!(error = %e, written = writer.written(), "Response send failed");
                    }

                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    let _ = self.stream.shutdown().await;
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads until the header terminator arrives or the peer closes, then parses
    /// whatever was collected.
    ///
    /// Returns `None` when nothing was received or the request line is malformed;
    /// either way the connection is closed without a response.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        while find_headers_end(&self.buffer).is_none() {
            self.buffer.reserve(READ_CHUNK);
            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                // Client closed connection
                break;
            }
        }

        match parse_http_request(&self.buffer) {
            Ok(request) => Ok(Some(request)),
            Err(e) => {
                debug!(error = %e, "Dropping connection without a response");
                Ok(None)
            }
        }
    }
}
