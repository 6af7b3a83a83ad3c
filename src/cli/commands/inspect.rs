//! `inspect` command.
//!
//! Prints per-collection entity counts of a map export. Nothing is written.

use crate::cli::args::{InspectArgs, OutputFormat};
use crate::error::VaultError;

/// Loads the map and prints its inventory.
///
/// # Errors
///
/// Returns an error if the map cannot be loaded or the JSON output cannot
/// be serialized.
pub fn run(args: &InspectArgs) -> Result<(), VaultError> {
    let inventory = crate::convert::inspect(&args.map_file)?;
    match args.format {
        OutputFormat::Human => print!("{}", inventory.render_human()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&inventory)?),
    }
    Ok(())
}
