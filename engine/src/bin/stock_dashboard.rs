// Single-asset stock dashboard.
use clap::Parser;
use engine::cli::{self, FrontEnd, SingleAssetCli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = SingleAssetCli::parse();
    cli::init_logging(args.common.verbose);
    cli::run(FrontEnd::Stock, args.common).await
}
