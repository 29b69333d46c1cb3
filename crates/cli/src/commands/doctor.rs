//! `consequences doctor` — Diagnose system health.

use std::path::Path;

use consequences_config::GameConfig;
use consequences_core::{ResponseStore, RosterStore};
use consequences_stores::{FileResponseStore, FileRosterStore};

use super::config_file;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Consequences Doctor — System Diagnostics");
    println!("==========================================\n");

    let mut issues = 0;

    let path = config_file(config_path);
    if !path.exists() {
        println!("  ⚠️  No config file — using defaults (run `consequences onboard`)");
        issues += 1;
    }

    let config = match GameConfig::load_with_env(&path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  1 blocking issue found.");
            return Ok(());
        }
    };

    // Response log header should name the configured categories
    let responses = FileResponseStore::new(config.stores.responses_path.clone());
    match responses.rows().await {
        Ok(rows) => {
            println!("  ✅ Response log readable ({} rows)", rows.len());
            let header = rows.first().map(|r| r.answers().to_vec()).unwrap_or_default();
            if header != config.categories.labels {
                println!(
                    "  ⚠️  Response log columns ({}) differ from categories.labels ({})",
                    header.join(", "),
                    config.categories.labels.join(", ")
                );
                issues += 1;
            }
        }
        Err(e) => {
            println!("  ❌ Response log: {e}");
            issues += 1;
        }
    }

    let roster = FileRosterStore::new(config.stores.roster_path.clone());
    match roster.session_key().await {
        Ok(key) => match roster.participants(&key).await {
            Ok(players) if players.is_empty() => {
                println!("  ⚠️  Nobody is playing session {key}");
                issues += 1;
            }
            Ok(players) => println!("  ✅ Roster: {} player(s) in session {key}", players.len()),
            Err(e) => {
                println!("  ❌ Roster: {e}");
                issues += 1;
            }
        },
        Err(e) => {
            println!("  ❌ Roster: {e}");
            issues += 1;
        }
    }

    if config.invitation.form_url.trim().is_empty() {
        println!("  ⚠️  invitation.form_url not set — `invite` will refuse to run");
        issues += 1;
    }

    match consequences_notifiers::from_config(&config.delivery) {
        Ok(notifier) => match notifier.health_check().await {
            Ok(true) => println!("  ✅ Notifier '{}' ready", notifier.name()),
            Ok(false) => {
                println!("  ⚠️  Notifier '{}' not ready", notifier.name());
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Notifier '{}': {e}", notifier.name());
                issues += 1;
            }
        },
        Err(e) => {
            println!("  ❌ Notifier: {e}");
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
