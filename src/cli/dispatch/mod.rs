//! Command-line argument dispatch and server initialization.
//!
//! This module maps validated CLI arguments to the appropriate action, such
//! as starting the API server with its configuration.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{DEFAULT_CORS_ORIGIN, DEFAULT_PENDING_SEED};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;
    let cors_origins = matches
        .get_one::<String>("cors-origins")
        .cloned()
        .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
    let pending_seed = matches
        .get_one::<u16>("pending-seed")
        .copied()
        .unwrap_or(DEFAULT_PENDING_SEED);

    Ok(Action::Server(Args {
        port,
        dsn,
        cors_origins,
        pending_seed,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_action_from_matches() {
        temp_env::with_vars(
            [
                ("ORGDESK_DSN", None::<&str>),
                ("ORGDESK_CORS_ORIGINS", None::<&str>),
                ("ORGDESK_PENDING_SEED", None::<&str>),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec![
                    "orgdesk",
                    "--dsn",
                    "postgres://user@localhost:5432/orgdesk",
                    "--pending-seed",
                    "10",
                ]);
                let action = handler(&matches).expect("server action");
                let Action::Server(args) = action;
                assert_eq!(args.port, 8080);
                assert_eq!(args.dsn, "postgres://user@localhost:5432/orgdesk");
                assert_eq!(args.cors_origins, DEFAULT_CORS_ORIGIN);
                assert_eq!(args.pending_seed, 10);
            },
        );
    }
}
