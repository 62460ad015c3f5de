//! Command implementations for the repoconf CLI

pub mod absent;
pub mod present;
pub mod purge;
pub mod tracking;

use serde::Serialize;

/// Print a command result either as a human-readable line or as JSON.
pub fn report<T: Serialize>(json: bool, outcome: &T, human: &str) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        println!("{}", human);
    }
    Ok(())
}
