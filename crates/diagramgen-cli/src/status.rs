//! `diagramgen status` — show configuration and provider status.

use anyhow::Result;
use colored::Colorize;

use diagramgen_core::config::{get_config_path, Config};
use diagramgen_core::utils::mask_secret;
use diagramgen_providers::{ProviderId, ProviderSet};

/// Run the status command.
pub fn run(config: &Config) -> Result<()> {
    let config_path = get_config_path();
    let providers = ProviderSet::from_config(&config.providers)?;

    println!();
    println!("{}", "📐 Diagramgen Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );
    println!("  {:<18} {}", "Listen:".bold(), config.server.bind_addr());

    println!();
    println!("  {}", "Providers:".bold());

    for id in ProviderId::ALL {
        let provider_config = config.providers.get(id.as_str()).cloned().unwrap_or_default();
        let key_status = if provider_config.is_configured() {
            format!("{} key {}", "✓".green(), mask_secret(&provider_config.api_key).dimmed())
        } else {
            format!("{}", "· not configured".dimmed())
        };
        let endpoint = providers
            .lookup(*id)
            .map(|d| format!("{} ({})", d.redacted_endpoint(), d.model()))
            .unwrap_or_default();
        println!("    {:<12} {}", id.display_name(), key_status);
        println!("    {:<12} {}", "", endpoint.dimmed());
    }

    println!();
    Ok(())
}
