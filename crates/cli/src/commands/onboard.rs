//! `consequences onboard` — First-time setup.

use std::path::Path;

use consequences_config::GameConfig;
use consequences_stores::FileResponseStore;

use super::{config_file, response_header};

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_file(config_path);

    println!("🎲 Consequences — First-Time Setup");
    println!("==================================\n");

    if let Some(dir) = config_path.parent() {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
            println!("✅ Created config directory: {}", dir.display());
        } else {
            println!("  Config directory exists: {}", dir.display());
        }
    }

    if !config_path.exists() {
        std::fs::write(&config_path, GameConfig::default_toml())?;
        println!("✅ Created {}", config_path.display());
    } else {
        println!("  Config file exists: {}", config_path.display());
    }

    let config = GameConfig::load_with_env(&config_path)?;

    let responses = FileResponseStore::new(config.stores.responses_path.clone());
    if responses.init(&response_header(&config)).await? {
        println!("✅ Created response log: {}", responses.path().display());
    } else {
        println!("  Response log exists: {}", responses.path().display());
    }

    let roster_path = &config.stores.roster_path;
    if !roster_path.exists() {
        if let Some(dir) = roster_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let session = chrono::Local::now().format("%Y-%m-%d").to_string();
        let header = serde_json::json!(["Name", "Email", session]);
        std::fs::write(roster_path, format!("{header}\n"))?;
        println!("✅ Created roster: {}", roster_path.display());
    } else {
        println!("  Roster exists: {}", roster_path.display());
    }

    println!();
    println!("Next steps:");
    println!("  1. Add players to the roster, one JSON array per line:");
    println!("     [\"Ann\", \"ann@example.com\", \"TRUE\"]");
    println!("  2. Set invitation.form_url and [delivery] in {}", config_path.display());
    println!("  3. consequences invite   → players answer the form");
    println!("  4. consequences play     → everyone gets their consequence");

    Ok(())
}
