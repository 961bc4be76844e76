use tokio::net::TcpListener;
use tracing::{debug, warn};

use crate::handler::Handler;
use crate::http::connection::Connection;

/// Handles one connection to completion before accepting the next.
///
/// A client that never finishes its request stalls every other client; there is
/// no timeout.
pub async fn serve<H: Handler>(listener: TcpListener, handler: &H) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "Accept failed");
                continue;
            }
        };
        debug!(%peer, "Accepted connection");

        let mut conn = Connection::new(socket);
        if let Err(e) = conn.run(handler).await {
            debug!(%peer, error = %e, "Connection error");
        }
    }
}
