use colored::*;
use md2pdf::cli::{log_filter, Args};
use md2pdf::Converter;
use std::process;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*};

async fn run(args: Args) -> anyhow::Result<()> {
    let options = args.into_options()?;
    let cwd = std::env::current_dir()?;
    Converter::new(options.resolve(&cwd)).run().await
}

#[tokio::main]
async fn main() {
    let rust_log = std::env::var("RUST_LOG").ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(rust_log.as_deref()))
        .init();

    let args = Args::parse_argv();

    if let Err(e) = run(args).await {
        error!("{}", format!("Error: {}", e).red());
        process::exit(1);
    }
}
