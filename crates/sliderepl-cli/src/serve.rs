//! Serve command implementation for sliderepl CLI.

use std::path::Path;

use sliderepl_server::{OutputMode, ServerConfig};

use crate::colors;

/// Start the presentation server.
pub async fn execute(slides: &Path, config: ServerConfig) -> anyhow::Result<()> {
    println!("\n{}sliderepl{} - Live Go Slides", colors::BOLD, colors::RESET);
    println!("{}", "─".repeat(50));

    println!(
        "{}  ◆ Slides:{} {}",
        colors::CYAN,
        colors::RESET,
        slides.display()
    );
    println!(
        "{}  ◆ Server:{} http://{}",
        colors::CYAN,
        colors::RESET,
        config.http
    );

    let output = match config.output_mode {
        OutputMode::Text => "escaped text",
        OutputMode::Html => "raw HTML",
    };
    println!("{}  ◆ Output:{} {}", colors::CYAN, colors::RESET, output);

    if let Some(timeout) = config.timeout {
        println!(
            "{}  ◆ Timeout:{} {:?}",
            colors::CYAN,
            colors::RESET,
            timeout
        );
    }

    println!("{}", "─".repeat(50));
    println!("{}Press Ctrl+C to stop{}", colors::GREEN, colors::RESET);
    println!();

    sliderepl_server::serve(slides, config).await?;

    Ok(())
}
