//! `consequences status` — Show configuration and the current session.

use std::path::Path;

use consequences_core::{ResponseStore, RosterStore};
use consequences_engine::ResponseWindowExtractor;
use consequences_stores::{FileResponseStore, FileRosterStore};

use super::{config_file, load_config};

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;

    println!("🎲 Consequences Status");
    println!("======================");
    println!("  Config:        {}", config_file(config_path).display());
    println!("  Responses:     {}", config.stores.responses_path.display());
    println!("  Roster:        {}", config.stores.roster_path.display());
    println!("  Max range:     {}s", config.window.max_ok_range_secs);
    println!("  Max missing:   {}", config.window.max_ok_missing);
    println!("  Notifier:      {}", config.delivery.notifier);
    println!("  Categories:    {}", config.categories.labels.join(" / "));

    println!();
    let roster = FileRosterStore::new(config.stores.roster_path.clone());
    let players = match roster.session_key().await {
        Ok(key) => match roster.participants(&key).await {
            Ok(players) => {
                println!("  Session:       {key}");
                println!("  Players:       {}", players.len());
                Some(players.len())
            }
            Err(e) => {
                println!("  ⚠️  Roster: {e}");
                None
            }
        },
        Err(e) => {
            println!("  ⚠️  Roster: {e}");
            None
        }
    };

    let responses = FileResponseStore::new(config.stores.responses_path.clone());
    match responses.column(0).await {
        Ok(timestamps) => {
            let window = ResponseWindowExtractor::from_config(&config.window).extract(&timestamps);
            println!("  Log rows:      {}", timestamps.len().saturating_sub(1));
            println!("  This session:  {} response(s)", window.size);
            if let Some(players) = players {
                let waiting = players.saturating_sub(window.size);
                if waiting > 0 {
                    println!("  Waiting on:    {waiting}");
                } else {
                    println!("\n  ✅ Everyone has answered — run `consequences play`");
                }
            }
        }
        Err(e) => println!("  ⚠️  Responses: {e}"),
    }

    Ok(())
}
