use lantern::cli::{self, ServerArgs};
use lantern::config::{Config, ServeMode};
use lantern::handler::StaticFiles;
use lantern::server;

/// Serves `.html`/`.htm` files from the working directory, one connection at a time.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    lantern::logging::init("info");

    let args: ServerArgs = cli::parse_or_exit();

    let mut base = Config::default();
    base.server.mode = ServeMode::Sequential;
    base.static_files.index = None;

    let cfg = args.resolve(base)?;
    let handler = StaticFiles::new(&cfg.static_files);

    tokio::select! {
        res = server::run(&cfg, handler) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
