use anyhow::Context;
use clap::Args;

use crate::auth::JwtAuthenticator;
use crate::config::AppConfig;

#[derive(Debug, Args)]
pub struct TokenArgs {
    #[arg(long, help = "Caller id to embed as the token subject")]
    pub user_id: i64,
}

pub fn handle(args: TokenArgs) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let authenticator =
        JwtAuthenticator::new(&config.security).context("invalid security configuration")?;

    let token = authenticator
        .issue(args.user_id)
        .context("failed to sign token")?;
    println!("{token}");
    Ok(())
}
