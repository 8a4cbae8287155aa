//! SeedFront CLI - runs the dashboard server

mod commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "seedfront")]
#[command(about = "Web dashboard for SeedboxSync")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::handle_command(cli.command).await
}
