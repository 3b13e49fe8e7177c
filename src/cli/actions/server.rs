use crate::api::{self, ServerConfig};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub cors_origins: String,
    pub pending_seed: u16,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let config = ServerConfig {
        cors_origins: args.cors_origins,
        pending_seed: args.pending_seed,
    };

    api::new(args.port, args.dsn, config).await
}
