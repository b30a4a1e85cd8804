use serde::{Deserialize, Serialize};

use crate::models::DatabaseSelector;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Base address of the database server, e.g. `http://127.0.0.1:8080`
    #[serde(default = "default_server_url")]
    pub server_url: String,

    // Path segment per logical database
    #[serde(default)]
    pub databases: DatabaseNames,

    /// Per-request timeout enforced by the HTTP transport (none when unset)
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub insecure_skip_verify: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DatabaseNames {
    #[serde(default = "default_exchange_name")]
    pub exchange: String,
    #[serde(default = "default_inventory_name")]
    pub inventory: String,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_exchange_name() -> String {
    DatabaseSelector::Exchange.default_name().to_string()
}

fn default_inventory_name() -> String {
    DatabaseSelector::Inventory.default_name().to_string()
}

impl DatabaseNames {
    pub fn name(&self, database: DatabaseSelector) -> &str {
        match database {
            DatabaseSelector::Exchange => &self.exchange,
            DatabaseSelector::Inventory => &self.inventory,
        }
    }
}

impl Default for DatabaseNames {
    fn default() -> Self {
        Self {
            exchange: default_exchange_name(),
            inventory: default_inventory_name(),
        }
    }
}

impl ClientConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    /// Server address without a trailing slash
    pub fn base_url(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }

    pub fn database_name(&self, database: DatabaseSelector) -> &str {
        self.databases.name(database)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            databases: DatabaseNames::default(),
            timeout_secs: None,
            insecure_skip_verify: false,
        }
    }
}
