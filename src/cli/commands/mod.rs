//! CLI command dispatch and handlers.
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod convert;
pub mod inspect;
pub mod version;

use crate::cli::args::{Cli, Commands};
use crate::error::VaultError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), VaultError> {
    match cli.command {
        Commands::Convert(args) => convert::run(&args).await,
        Commands::Inspect(args) => inspect::run(&args),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}
