//! `consequences submit` — Add a response to the local response log.

use std::path::Path;

use consequences_stores::FileResponseStore;

use super::load_config;

pub async fn run(
    config_path: Option<&Path>,
    answers: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let labels = &config.categories.labels;

    if answers.len() != labels.len() {
        println!(
            "❌ Expected {} answers ({}), got {}",
            labels.len(),
            labels.join(", "),
            answers.len()
        );
        return Err("wrong number of answers".into());
    }

    let store = FileResponseStore::new(config.stores.responses_path.clone());
    let row = store.append(&answers).await?;
    println!("✅ Response recorded at {}", row.timestamp());

    Ok(())
}
