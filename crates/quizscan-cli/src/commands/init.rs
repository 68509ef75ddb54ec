//! The `quizscan init` command.

use std::path::Path;

use anyhow::{Context, Result};

use quizscan_providers::config::SAMPLE_CONFIG;

pub fn execute() -> Result<()> {
    let path = Path::new("quizscan.toml");
    if path.exists() {
        println!("quizscan.toml already exists, skipping.");
    } else {
        std::fs::write(path, SAMPLE_CONFIG).context("failed to write quizscan.toml")?;
        println!("Created quizscan.toml");
    }

    println!("\nNext steps:");
    println!("  1. Export GEMINI_API_KEY (or edit quizscan.toml)");
    println!("  2. Run: quizscan scan --image paper.jpg");
    println!("  3. Run: quizscan grade --student paper.jpg --reference key.jpg --save");

    Ok(())
}
