use clap::Parser;
use tagbridge_cli::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  tagbridge_cli::init_tracing(cli.verbose);
  tagbridge_cli::run(cli).await
}
