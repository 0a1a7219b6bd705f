use clap::Parser;

use vhdscan_cli::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = vhdscan_cli::run(cli).await {
        tracing::error!(error = %e, exit_code = e.exit_code(), "command failed");
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }

    Ok(())
}
