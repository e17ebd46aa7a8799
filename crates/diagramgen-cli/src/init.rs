//! `diagramgen init` — write a default config file.

use anyhow::{Context, Result};
use colored::Colorize;

use diagramgen_core::config::{get_config_path, save_config, Config};

/// Run the init command.
///
/// Never overwrites an existing file. Keys are left empty; they are expected
/// to come from the environment or be filled in by hand.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "📐 Diagramgen — Setup".cyan().bold());
    println!();

    let config_path = get_config_path();

    if config_path.exists() {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        save_config(&Config::default(), Some(&config_path))
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    }

    println!();
    println!(
        "{}",
        "Set DEEPSEEK_API_KEY / GEMINI_API_KEY (or edit the file), then run `diagramgen serve`."
            .dimmed()
    );
    println!();
    Ok(())
}
