use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::response::CommandResponse;

/// Normalized outcome of a database operation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseCode {
    #[default]
    Unknown,
    Ok,
    InvalidRequest,
    NotFound,
    Found,
    NotModified,
    ConcurrencyException,
    ServerError,
    ClientError,
    AccessForbidden,
    ConnectionRefused,
    DeserializationError,
    SerializationError,
}

impl ResponseCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::Unknown => "UNKNOWN",
            ResponseCode::Ok => "OK",
            ResponseCode::InvalidRequest => "INVALID_REQUEST",
            ResponseCode::NotFound => "NOT_FOUND",
            ResponseCode::Found => "FOUND",
            ResponseCode::NotModified => "NOT_MODIFIED",
            ResponseCode::ConcurrencyException => "CONCURRENCY_EXCEPTION",
            ResponseCode::ServerError => "SERVER_ERROR",
            ResponseCode::ClientError => "CLIENT_ERROR",
            ResponseCode::AccessForbidden => "ACCESS_FORBIDDEN",
            ResponseCode::ConnectionRefused => "CONNECTION_REFUSED",
            ResponseCode::DeserializationError => "DESERIALIZATION_ERROR",
            ResponseCode::SerializationError => "SERIALIZATION_ERROR",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ResponseCode::Ok)
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical database a request is routed to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseSelector {
    Exchange,
    Inventory,
}

impl DatabaseSelector {
    pub const ALL: [DatabaseSelector; 2] = [DatabaseSelector::Exchange, DatabaseSelector::Inventory];

    /// Path segment used when the configuration does not override it
    pub fn default_name(&self) -> &'static str {
        match self {
            DatabaseSelector::Exchange => "Exchange",
            DatabaseSelector::Inventory => "Inventory",
        }
    }
}

impl fmt::Display for DatabaseSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown database: {0}")]
pub struct ParseDatabaseSelectorError(pub String);

impl FromStr for DatabaseSelector {
    type Err = ParseDatabaseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exchange" => Ok(DatabaseSelector::Exchange),
            "inventory" => Ok(DatabaseSelector::Inventory),
            _ => Err(ParseDatabaseSelectorError(s.to_string())),
        }
    }
}

/// Result of a bulk `atomic_update` call
///
/// `results` holds one entry per recognized result the server returned, in
/// server order. Entries are matched to commands by their type only, so a
/// caller that needs to know which command produced which result should
/// inspect the ids (see [`BatchResponse::find_by_id`]).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchResponse {
    pub success: bool,
    pub code: ResponseCode,
    pub results: Vec<CommandResponse>,
}

impl BatchResponse {
    /// A failed batch carrying no results
    pub fn failed(code: ResponseCode) -> Self {
        Self {
            success: false,
            code,
            results: Vec::new(),
        }
    }

    /// First result whose document id equals `id`
    pub fn find_by_id(&self, id: &str) -> Option<&CommandResponse> {
        self.results.iter().find(|r| r.id() == id)
    }
}

/// Result of a single-document PUT
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateDocumentResponse {
    pub success: bool,
    pub code: ResponseCode,
    pub id: String,
    pub change_vector: String,
}

impl UpdateDocumentResponse {
    pub fn failed(code: ResponseCode) -> Self {
        Self {
            code,
            ..Self::default()
        }
    }

    /// Build a successful response from the server's JSON body
    ///
    /// `Id` and `ChangeVector` are optional; absent or non-string values
    /// leave the field empty.
    pub fn from_json(body: &serde_json::Value) -> Self {
        let field = |name: &str| {
            body.get(name)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };

        Self {
            success: true,
            code: ResponseCode::Ok,
            id: field("Id"),
            change_vector: field("ChangeVector"),
        }
    }
}
