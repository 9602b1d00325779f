//! Export command implementation for sliderepl CLI.
//!
//! Writes the whole deck as one HTML page that needs no server: slides are
//! stepped through client-side and snippets cannot be run.

use std::fs;
use std::path::Path;

use sliderepl_core::SlideDeck;
use sliderepl_server::render;

use crate::colors;

/// Render `slides` into a standalone HTML file at `output`.
pub fn execute(slides: &Path, output: &Path) -> anyhow::Result<()> {
    let deck = SlideDeck::load(slides)?;
    let html = render::static_page(&deck);

    println!(
        "{}Writing to{} {} {}({} slides){}",
        colors::BOLD,
        colors::RESET,
        output.display(),
        colors::DIM,
        deck.len(),
        colors::RESET
    );

    fs::write(output, html)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", output.display(), e))?;

    Ok(())
}
