use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tracing::info;

use crate::config::{Config, ServeMode, ServerConfig};
use crate::handler::Handler;
use crate::server::{multiplexed::Multiplexer, sequential};

/// Binds the configured address with `SO_REUSEADDR` and the configured backlog.
pub fn bind(cfg: &ServerConfig) -> anyhow::Result<TcpListener> {
    let addr = cfg.listen_addr()?;

    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4()?,
        SocketAddr::V6(_) => TcpSocket::new_v6()?,
    };
    socket.set_reuseaddr(true)?;
    socket
        .bind(addr)
        .with_context(|| format!("failed to bind {}", addr))?;

    Ok(socket.listen(cfg.backlog)?)
}

pub async fn run<H: Handler>(cfg: &Config, handler: H) -> anyhow::Result<()> {
    let listener = bind(&cfg.server)?;
    let port = listener.local_addr()?.port();
    info!(port, mode = ?cfg.server.mode, "Listening on port {}", port);

    serve(listener, &cfg.server, &handler).await
}

/// Serves connections from an already bound listener until a fatal error.
pub async fn serve<H: Handler>(
    listener: TcpListener,
    cfg: &ServerConfig,
    handler: &H,
) -> anyhow::Result<()> {
    match cfg.mode {
        ServeMode::Sequential => sequential::serve(listener, handler).await,
        ServeMode::Multiplexed => {
            Multiplexer::new(listener, cfg.read_chunk)
                .run(handler)
                .await
        }
    }
}
