//! Batch Update Example
//!
//! Writes two documents and removes a third in one atomic bulk request,
//! then reads the new documents back.
//!
//! Run with: cargo run --example batch_update

use ravenlink_rs::*;
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("Ravenlink Batch Update Example\n");

    let client = Client::new(ClientConfig::new("http://127.0.0.1:8080"))?;
    let database = DatabaseSelector::Inventory;

    let batch = BatchRequest::new()
        .put("items/1", json!({ "Name": "Rope", "Qty": 12 }))
        .put("items/2", json!({ "Name": "Lantern", "Qty": 3 }))
        .delete("items/obsolete");

    let timed = measure_latency(|| client.atomic_update(&batch, database)).await;
    println!("Batch: {} ({:.2}ms)", timed.response.code, timed.latency);

    for result in &timed.response.results {
        match result {
            CommandResponse::Put(put) => println!("   PUT    {} -> {}", put.id, put.change_vector),
            CommandResponse::Delete(del) => println!("   DELETE {} deleted={}", del.id, del.deleted),
        }
    }

    if !timed.response.success {
        return Ok(());
    }

    let docs = client
        .get_documents(&["items/1", "items/2"], database)
        .await;
    for (id, json) in &docs {
        println!("\n{}: {}", id, json);
    }

    Ok(())
}
