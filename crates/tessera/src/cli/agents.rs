//! The demo roster listing.

use std::path::Path;
use tessera::{DemoRoster, TesseraResult};

/// Print the roster, one agent per line.
pub fn list_roster(path: Option<&Path>) -> TesseraResult<()> {
    let roster = match path {
        Some(path) => DemoRoster::from_file(path)?,
        None => DemoRoster::bundled()?,
    };
    for entry in roster.agents() {
        println!(
            "{:<16} {:<24} {:<8} {}",
            entry.id(),
            entry.name(),
            entry.preset().proposed_position(),
            entry.shades().join(", ")
        );
    }
    Ok(())
}
