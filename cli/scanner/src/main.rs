//! bt-scan CLI
//!
//! Size and content scanner for date-partitioned buckets.

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::warn;

mod args;
mod run;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Logs go to stderr; stdout is reserved for object content or JSON
    bt_cli_common::init_logging(args.log_level)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling scan");
            ctrl_c.cancel();
        }
    });

    let result = match run::execute(&args, &cancel).await {
        Ok(report) => run::report(&args, &report),
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(run::exit_code(&e));
    }

    Ok(())
}
