use anyhow::Result;
use serde_json::{json, Value};
use std::fs;

use dot2connect_api::config::Config;
use dot2connect_api::db::connect_store;
use dot2connect_api::db_storage::LeadStorage;
use dot2connect_api::validation::validate_lead;

/// Seeds the configured store with leads.
///
/// Usage: `cargo run --example seed_leads [leads.json]`
///
/// The optional file must hold a JSON array of lead submissions. Without it
/// a small built-in sample is used.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("=== Seed Leads ===\n");

    let config = Config::from_env()?;
    let store = connect_store(&config).await;
    if !store.is_connected() {
        anyhow::bail!("Document store is not configured (set DATABASE_URL and DATABASE_NAME)");
    }
    let storage = LeadStorage::new(store.clone());

    let payloads: Vec<Value> = match std::env::args().nth(1) {
        Some(path) => {
            println!("Reading leads from {}", path);
            serde_json::from_str(&fs::read_to_string(&path)?)?
        }
        None => sample_leads(),
    };

    let total = payloads.len();
    let mut success_count = 0;
    let mut fail_count = 0;

    for (idx, payload) in payloads.iter().enumerate() {
        let lead = match validate_lead(payload) {
            Ok(lead) => lead,
            Err(e) => {
                println!("[{}/{}] ❌ Skipped: {}", idx + 1, total, e);
                fail_count += 1;
                continue;
            }
        };

        match storage.create_lead(&lead).await {
            Ok(id) => {
                println!("[{}/{}] ✓ {} <{}> -> {}", idx + 1, total, lead.name, lead.email, id);
                success_count += 1;
            }
            Err(e) => {
                println!("[{}/{}] ❌ Failed to store {}: {}", idx + 1, total, lead.email, e);
                fail_count += 1;
            }
        }
    }

    store.shutdown().await;

    println!("\n=== Done ===");
    println!("Stored: {}", success_count);
    println!("Failed: {}", fail_count);

    Ok(())
}

fn sample_leads() -> Vec<Value> {
    vec![
        json!({"name": "Ada Lovelace", "email": "ada@example.com", "company": "Analytical Engines"}),
        json!({
            "name": "Grace Hopper",
            "email": "grace@example.com",
            "phone": "+1 555 0199",
            "service_interest": "consulting",
            "message": "Looking for help with a compiler project"
        }),
        json!({"name": "Alan Turing", "email": "alan@example.com", "service_interest": "research"}),
    ]
}
