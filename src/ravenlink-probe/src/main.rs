//! Round-trip probe against a document database server
//!
//! Usage: ravenlink [exchange|inventory]
//!
//! Reads `ravenlink.json` (or `$RAVENLINK_CONFIG`), then exercises every
//! client operation on a throwaway document and logs each latency.

use anyhow::{bail, Result};
use ravenlink_rs::{
    measure_latency, BatchRequest, Client, ClientConfig, CommandResponse, DatabaseSelector,
    DeleteCommand, PutCommand,
};
use serde_json::json;

mod telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = telemetry::init_telemetry()?;

    let config_path =
        std::env::var("RAVENLINK_CONFIG").unwrap_or_else(|_| "ravenlink.json".to_string());
    let config = ClientConfig::load(&config_path).unwrap_or_else(|_| {
        tracing::warn!("Failed to load {}, using defaults", config_path);
        ClientConfig::default()
    });

    let database: DatabaseSelector = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => DatabaseSelector::Exchange,
    };

    tracing::info!("ravenlink probe starting");
    tracing::info!("  Server: {}", config.base_url());
    tracing::info!("  Database: {}", config.database_name(database));

    let client = Client::new(config)?;
    let id = format!("probes/{}", uuid::Uuid::new_v4());

    // Create through the bulk endpoint
    let mut batch = BatchRequest::new();
    batch.push(PutCommand::new(&id, json!({ "Kind": "probe", "Attempt": 1 })));
    let timed = measure_latency(|| client.atomic_update(&batch, database)).await;
    tracing::info!("atomic_update: {} in {:.2}ms", timed.response.code, timed.latency);
    if !timed.response.success {
        bail!("batch put failed: {}", timed.response.code);
    }
    if let Some(CommandResponse::Put(put)) = timed.response.find_by_id(&id) {
        tracing::info!("  stored {} at {}", put.id, put.change_vector);
    }

    let ids = [id.as_str()];
    let timed = measure_latency(|| client.get_documents(&ids, database)).await;
    match timed.response.get(&id) {
        Some(doc) if !doc.is_empty() => {
            tracing::info!("get_documents: {} in {:.2}ms", doc, timed.latency)
        }
        _ => bail!("document {} could not be fetched", id),
    }

    let body = json!({ "Kind": "probe", "Attempt": 2 }).to_string();
    let timed = measure_latency(|| client.update_document(&id, &body, database)).await;
    tracing::info!("update_document: {} in {:.2}ms", timed.response.code, timed.latency);
    if !timed.response.success {
        bail!("update failed: {}", timed.response.code);
    }

    let change_vector = timed.response.change_vector;
    let timed = measure_latency(|| client.delete_document_if_match(&id, &change_vector, database))
        .await;
    tracing::info!("delete_document: deleted={} in {:.2}ms", timed.response, timed.latency);

    // Deleting again through the batch path reports Deleted=false
    let mut batch = BatchRequest::new();
    batch.push(DeleteCommand::new(&id));
    let timed = measure_latency(|| client.atomic_update(&batch, database)).await;
    for result in &timed.response.results {
        if let CommandResponse::Delete(delete) = result {
            tracing::info!("  {} deleted={}", delete.id, delete.deleted);
        }
    }

    tracing::info!("Probe finished");
    Ok(())
}
