use anyhow::Result;
use clap::Parser;

use deepresearch_rs::cli::Args;
use deepresearch_rs::logging::init_tracing;
use deepresearch_rs::workflow::{LaunchOptions, launch};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.to_config()?;
    init_tracing(config.verbose, args.log_format);

    let options = LaunchOptions {
        query: args.query_text(),
        json: args.json,
    };
    launch(&config, &options).await
}
