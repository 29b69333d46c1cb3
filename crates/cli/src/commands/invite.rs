//! `consequences invite` — Send the form link to this session's players.

use std::path::Path;

use consequences_engine::send_invitations;
use consequences_stores::FileRosterStore;

use super::load_config;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let roster = FileRosterStore::new(config.stores.roster_path.clone());
    let notifier = consequences_notifiers::from_config(&config.delivery)?;

    let report = send_invitations(&roster, notifier.as_ref(), &config.invitation).await?;

    println!("📨 Session {}", report.session_key);
    println!("   Invited: {}", report.invited.len());
    for failure in &report.failed {
        println!("   ⚠️  {} <{}>: {}", failure.name, failure.address, failure.reason);
    }

    Ok(())
}
