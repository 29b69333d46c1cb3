//! `consequences play` — Build and deliver this session's consequences.

use std::path::Path;
use std::sync::Arc;

use consequences_config::GameConfig;
use consequences_core::{Notifier, ResponseStore, RosterStore};
use consequences_engine::{SessionPlan, SessionRunner};
use consequences_stores::{FileResponseStore, FileRosterStore};

use super::load_config;

pub fn session_runner(config: &GameConfig, notifier: Arc<dyn Notifier>) -> SessionRunner {
    let responses: Arc<dyn ResponseStore> =
        Arc::new(FileResponseStore::new(config.stores.responses_path.clone()));
    let roster: Arc<dyn RosterStore> =
        Arc::new(FileRosterStore::new(config.stores.roster_path.clone()));
    SessionRunner::new(config, responses, roster, notifier)
}

pub async fn run(
    config_path: Option<&Path>,
    dry_run: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let notifier = consequences_notifiers::from_config(&config.delivery)?;
    let runner = session_runner(&config, notifier);

    let plan = runner.plan().await?;

    if dry_run {
        if json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            print_plan(&plan);
        }
        return Ok(());
    }

    let report = runner.deliver(plan).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("🎲 Session {}", report.session_key);
    println!("   Responses in window: {}", report.window_size);
    println!("   Used:                {}", report.consumed);
    if report.clamped {
        println!("   ⚠️  More responses than players; kept the most recent");
    }
    if report.padded > 0 {
        println!("   ⚠️  {} filler consequence(s) added", report.padded);
    }
    println!("   Delivered:           {}", report.delivered.len());
    for failure in &report.failed {
        println!("   ❌ {} <{}>: {}", failure.name, failure.address, failure.reason);
    }

    Ok(())
}

fn print_plan(plan: &SessionPlan) {
    println!("🎲 Session {} (dry run)", plan.session_key);
    println!(
        "   Window: {} response(s), using {}, {} filler",
        plan.window.size, plan.quota.consumed, plan.padded
    );
    println!();
    for delivery in &plan.deliveries {
        let marker = if delivery.filler { " (filler)" } else { "" };
        println!("── {}{marker}", delivery.participant);
        println!("{}", delivery.body);
        println!();
    }
}
