// Profile Hunter binary entry point.

use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = hunter_app::Args::parse();
    hunter_app::init_tracing();

    match hunter_app::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Hunt failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}
