use lantern::cli::{self, ServerArgs};
use lantern::config::{Config, ServeMode};
use lantern::handler::ProductHandler;
use lantern::server;

/// Answers `GET /product?a=2&b=3` with the product of the values as JSON.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    lantern::logging::init("info");

    let args: ServerArgs = cli::parse_or_exit();

    let mut base = Config::default();
    base.server.mode = ServeMode::Sequential;

    let cfg = args.resolve(base)?;

    tokio::select! {
        res = server::run(&cfg, ProductHandler) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
