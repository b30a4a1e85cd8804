//! Ravenlink Core Library
//!
//! Transport-free building blocks for talking to a RavenDB-style document
//! database over REST:
//! - Document commands and their bulk request body
//! - Per-command batch results and single-document responses
//! - Client configuration and URL construction
//! - HTTP status normalization
//! - Latency measurement for async operations

pub mod command;
pub mod config;
pub mod latency;
pub mod models;
pub mod response;
pub mod status;
pub mod url;

// Re-export commonly used types
pub use command::{BatchRequest, Command, DeleteCommand, PutCommand};
pub use config::{ClientConfig, DatabaseNames};
pub use latency::{measure_latency, TimedResponse};
pub use models::*;
pub use response::{CommandResponse, DeleteCommandResponse, PutCommandResponse};
pub use status::{status_to_response_code, TRANSPORT_FAILURE_STATUS};
pub use url::{build_url, BULK_DOCS_ENDPOINT, DOCS_ENDPOINT};
