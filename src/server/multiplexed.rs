//! Single-task readiness multiplexer.
//!
//! The listener and every in-progress connection are polled for read readiness
//! in one pass. Each ready connection gets exactly one bounded non-blocking read
//! per pass, so a request may take many passes to arrive. A connection whose
//! buffer holds the header terminator is marked complete; at the end of the pass
//! every complete connection leaves the registry and is answered inline, so the
//! write of a response holds up the loop until it finishes.
//!
//! ```text
//! AwaitingHeaders --(\r\n\r\n seen)--> Complete --(response sent)--> Closed
//! AwaitingHeaders --(peer EOF)-------------------------------------> Closed
//! ```

use std::collections::HashMap;
use std::future::poll_fn;
use std::io;
use std::net::SocketAddr;
use std::task::{Context, Poll};

use bytes::BytesMut;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, trace, warn};

use crate::handler::Handler;
use crate::http::connection::Connection;
use crate::http::parser::{HEADER_TERMINATOR, find_headers_end};

pub type ConnectionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    AwaitingHeaders,
    Complete,
}

struct PendingConnection {
    stream: TcpStream,
    peer: SocketAddr,
    buffer: BytesMut,
    state: ParseState,
}

#[derive(Default)]
struct Readiness {
    accepted: Vec<(TcpStream, SocketAddr)>,
    readable: Vec<ConnectionId>,
}

impl Readiness {
    fn is_empty(&self) -> bool {
        self.accepted.is_empty() && self.readable.is_empty()
    }
}

pub struct Multiplexer {
    listener: TcpListener,
    connections: HashMap<ConnectionId, PendingConnection>,
    next_id: ConnectionId,
    scratch: Vec<u8>,
}

impl Multiplexer {
    /// `read_chunk` bounds how many bytes one readiness notification may consume.
    pub fn new(listener: TcpListener, read_chunk: usize) -> Self {
        Self {
            listener,
            connections: HashMap::new(),
            next_id: 0,
            scratch: vec![0; read_chunk.max(1)],
        }
    }

    /// Connections accepted but not yet answered or closed.
    pub fn open_connections(&self) -> usize {
        self.connections.len()
    }

    pub async fn run<H: Handler>(mut self, handler: &H) -> anyhow::Result<()> {
        loop {
            self.turn(handler).await;
        }
    }

    /// One cycle: wait for readiness, then accept and read whatever is ready.
    pub async fn turn<H: Handler>(&mut self, handler: &H) {
        let ready = self.poll_ready().await;

        for (stream, peer) in ready.accepted {
            self.register(stream, peer);
        }

        for id in ready.readable {
            self.service(id);
        }

        let complete: Vec<ConnectionId> = self
            .connections
            .iter()
            .filter(|(_, conn)| conn.state == ParseState::Complete)
            .map(|(id, _)| *id)
            .collect();
        for id in complete {
            self.respond(id, handler).await;
        }
    }

    async fn poll_ready(&self) -> Readiness {
        poll_fn(|cx| {
            let mut ready = Readiness::default();

            drain_accepts(cx, &mut ready.accepted, |cx| self.listener.poll_accept(cx));

            for (id, conn) in &self.connections {
                if conn.state == ParseState::AwaitingHeaders
                    && conn.stream.poll_read_ready(cx).is_ready()
                {
                    ready.readable.push(*id);
                }
            }

            if ready.is_empty() {
                Poll::Pending
            } else {
                Poll::Ready(ready)
            }
        })
        .await
    }

    fn register(&mut self, stream: TcpStream, peer: SocketAddr) {
        let id = self.next_id;
        self.next_id += 1;

        debug!(connection = id, %peer, "Accepted connection");
        self.connections.insert(
            id,
            PendingConnection {
                stream,
                peer,
                buffer: BytesMut::new(),
                state: ParseState::AwaitingHeaders,
            },
        );
    }

    fn service(&mut self, id: ConnectionId) {
        let Some(conn) = self.connections.get_mut(&id) else {
            return;
        };

        match conn.stream.try_read(&mut self.scratch) {
            Ok(0) => {
                debug!(connection = id, peer = %conn.peer, "Peer closed before finishing a request");
                self.close(id);
            }
            Ok(n) => {
                // Only the new bytes and the three before them can complete a terminator.
                let from = conn.buffer.len().saturating_sub(HEADER_TERMINATOR.len() - 1);
                conn.buffer.extend_from_slice(&self.scratch[..n]);
                trace!(connection = id, read = n, buffered = conn.buffer.len(), "Read");

                if find_headers_end(&conn.buffer[from..]).is_some() {
                    conn.state = ParseState::Complete;
                }
            }
            // Readiness was stale; tokio has cleared it and will report again.
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
            Err(e) => {
                debug!(connection = id, error = %e, "Read failed");
                self.close(id);
            }
        }
    }

    async fn respond<H: Handler>(&mut self, id: ConnectionId, handler: &H) {
        let Some(conn) = self.connections.remove(&id) else {
            return;
        };

        let peer = conn.peer;
        let mut connection = Connection::resume(conn.stream, conn.buffer);
        if let Err(e) = connection.run(handler).await {
            debug!(connection = id, %peer, error = %e, "Connection error");
        }
    }

    fn close(&mut self, id: ConnectionId) {
        // Dropping the stream closes the socket.
        self.connections.remove(&id);
    }
}

/// Takes every connection the listener has queued.
///
/// An accept error leaves no waker registered with the listener, so the task is
/// woken at once to poll it again on the next pass.
fn drain_accepts<T>(
    cx: &mut Context<'_>,
    accepted: &mut Vec<T>,
    mut poll_accept: impl FnMut(&mut Context<'_>) -> Poll<io::Result<T>>,
) {
    loop {
        match poll_accept(cx) {
            Poll::Ready(Ok(conn)) => accepted.push(conn),
            Poll::Ready(Err(e)) => {
                warn!(error = %e, "Accept failed");
                cx.waker().wake_by_ref();
                break;
            }
            Poll::Pending => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::{Wake, Waker};

    use super::*;

    #[derive(Default)]
    struct CountingWaker(AtomicUsize);

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            self.wake_by_ref();
        }

        fn wake_by_ref(self: &Arc<Self>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn drain(results: Vec<Poll<io::Result<u32>>>) -> (Vec<u32>, usize) {
        let counter = Arc::new(CountingWaker::default());
        let waker = Waker::from(counter.clone());
        let mut cx = Context::from_waker(&waker);

        let mut results = results.into_iter();
        let mut accepted = Vec::new();
        drain_accepts(&mut cx, &mut accepted, |_| {
            results.next().unwrap_or(Poll::Pending)
        });

        (accepted, counter.0.load(Ordering::SeqCst))
    }

    #[test]
    fn accept_error_wakes_the_task() {
        let (accepted, wakes) = drain(vec![
            Poll::Ready(Ok(1)),
            Poll::Ready(Err(io::Error::other("too many open files"))),
            Poll::Ready(Ok(2)),
        ]);

        assert_eq!(accepted, vec![1]);
        assert_eq!(wakes, 1);
    }

    #[test]
    fn pending_listener_does_not_wake() {
        let (accepted, wakes) = drain(vec![Poll::Ready(Ok(1)), Poll::Ready(Ok(2))]);

        assert_eq!(accepted, vec![1, 2]);
        assert_eq!(wakes, 0);
    }
}
