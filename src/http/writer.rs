use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.0";

/// Bodies go out at most this many bytes per write call.
pub const WRITE_CHUNK: usize = 4096;

pub fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    for (k, v) in resp.headers.iter() {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Full wire form of a response: head followed by the body.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let mut buf = serialize_head(resp);
    buf.extend_from_slice(&resp.body);
    buf
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Writes the remaining bytes in `WRITE_CHUNK` slices, retrying short writes
    /// until each slice is fully sent.
    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let end = (self.written + WRITE_CHUNK).min(self.buffer.len());

            while self.written < end {
                let n = stream.write(&self.buffer[self.written..end]).await?;

                if n == 0 {
                    return Err(anyhow::anyhow!("connection closed while writing"));
                }

                self.written += n;
            }
        }

        stream.flush().await?;
        Ok(())
    }
}
