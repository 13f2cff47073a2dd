//! authprobe entry point

use authprobe::cli;
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = cli::Cli::parse();

    // Logs go to stderr; stdout carries the report.
    let default_level = if args.verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .try_init();

    let code = cli::run(args).await;
    std::process::exit(code.0);
}
