use std::process::ExitCode;

use lantern::cli::{self, FetchArgs};
use lantern::client::{FetchOutcome, Fetcher};
use tokio::io::AsyncWriteExt;

/// Fetches an `http://` URL and prints the HTML body to stdout.
///
/// Exits 0 only for a 200 `text/html` response. Bodies of 4xx/5xx responses are
/// still printed before exiting 1.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    lantern::logging::init("info");

    let args: FetchArgs = cli::parse_or_exit();

    let outcome = match Fetcher::new().fetch(&args.url).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = tokio::io::stdout();
    if let Err(e) = async {
        stdout.write_all(outcome.body()).await?;
        stdout.flush().await
    }
    .await
    {
        eprintln!("Error: failed to write body: {}", e);
        return ExitCode::FAILURE;
    }

    match outcome {
        FetchOutcome::Success(_) => ExitCode::SUCCESS,
        FetchOutcome::ErrorStatus { .. } => ExitCode::FAILURE,
    }
}
