//! `consequences config` — Configuration management commands.

use std::path::Path;

use consequences_config::NotifierKind;

use super::{config_file, load_config};

pub async fn validate(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match load_config(config_path) {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();

            if config.invitation.form_url.trim().is_empty() {
                warnings.push("invitation.form_url is empty; `invite` will fail");
            }

            if config.window.max_ok_range_secs == 0 {
                warnings.push("window.max_ok_range_secs is 0; only simultaneous answers count");
            }

            if config.delivery.notifier == NotifierKind::Webhook
                && config.delivery.webhook_secret.is_none()
            {
                warnings.push("Webhook payloads are unsigned (set CONSEQUENCES_WEBHOOK_SECRET)");
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Window:    {}s, {} may be missing", config.window.max_ok_range_secs, config.window.max_ok_missing);
            println!("   Notifier:  {}", config.delivery.notifier);
            println!("   Responses: {}", config.stores.responses_path.display());
            println!("   Roster:    {}", config.stores.roster_path.display());
        }
        Err(e) => {
            println!("   ❌ {e}");
            return Err(e);
        }
    }

    Ok(())
}

pub async fn show(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config_path)?;
    if config.delivery.webhook_secret.is_some() {
        config.delivery.webhook_secret = Some("[REDACTED]".into());
    }
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", config_file(config_path).display());
    Ok(())
}
