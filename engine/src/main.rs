// Multi-asset trend dashboard: the user picks stock or crypto.
use clap::Parser;
use engine::cli::{self, FrontEnd, MultiAssetCli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = MultiAssetCli::parse();
    cli::init_logging(args.common.verbose);

    tracing::info!(asset = %args.asset, "Starting trend dashboard");
    cli::run(FrontEnd::MultiAsset(args.asset), args.common).await
}
