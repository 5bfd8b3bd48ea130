pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "internal-sea-core")]
#[command(about = "Internal Sea Core API - items and organizations over REST")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Print a bearer token signed with the configured secret")]
    Token(commands::token::TokenArgs),
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Serve(args)) => commands::serve::handle(args).await,
        Some(Commands::Token(args)) => commands::token::handle(args),
        None => commands::serve::handle(commands::serve::ServeArgs::default()).await,
    }
}
