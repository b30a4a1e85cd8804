//! Ravenlink Client Library
//!
//! Async HTTP client for a RavenDB-style document database: bulk command
//! batches plus single-document get, put and delete.
//!
//! Document operations never fail with `Err`; the outcome is carried in the
//! returned value (`success` / [`ResponseCode`]).

mod client;
mod transport;

pub use client::Client;
pub use ravenlink_core::{
    measure_latency, BatchRequest, BatchResponse, ClientConfig, Command, CommandResponse,
    DatabaseSelector, DeleteCommand, DeleteCommandResponse, PutCommand, PutCommandResponse,
    ResponseCode, TimedResponse, UpdateDocumentResponse,
};
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
