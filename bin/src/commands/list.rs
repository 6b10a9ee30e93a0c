//! List command implementation.
//!
//! This module fetches the archive's pair listing and prints it, optionally
//! filtered by a search pattern.

use anyhow::{Context, Result};
use exfin_lib::prelude::*;

/// List the pairs published by the archive.
pub(crate) async fn list_pairs(config: ClientConfig, search: Option<&str>) -> Result<()> {
    let archive = TickArchive::connect(config)
        .await
        .context("Failed to load the pair listing")?;

    let pairs: Vec<&Pair> = match search {
        Some(pattern) => archive.registry().search(pattern),
        None => archive.available_pairs().iter().collect(),
    };

    if pairs.is_empty() {
        println!("No pairs found.");
        return Ok(());
    }

    println!("PAIR");
    println!("{}", "-".repeat(15));
    for pair in &pairs {
        println!("{pair}");
    }

    println!("\nTotal: {} pairs", pairs.len());
    Ok(())
}
