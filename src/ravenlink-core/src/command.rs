use serde::{Deserialize, Serialize, Serializer};

/// A single document mutation inside a bulk request
///
/// Serializes to `{"Type": "PUT" | "DELETE", "Id": ..., ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub enum Command {
    #[serde(rename = "PUT")]
    Put(PutCommand),
    #[serde(rename = "DELETE")]
    Delete(DeleteCommand),
}

impl Command {
    /// Discriminator sent as the `Type` field
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Put(_) => "PUT",
            Command::Delete(_) => "DELETE",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Command::Put(cmd) => &cmd.id,
            Command::Delete(cmd) => &cmd.id,
        }
    }
}

/// Create or replace a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutCommand {
    pub id: String,
    pub document: serde_json::Value,
    // Always present on the wire: null means "no concurrency check"
    #[serde(default, serialize_with = "empty_as_null")]
    pub change_vector: Option<String>,
}

impl PutCommand {
    pub fn new(id: impl Into<String>, document: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            document,
            change_vector: None,
        }
    }

    /// Only apply the put if the stored document still has this change vector
    pub fn with_change_vector(mut self, change_vector: impl Into<String>) -> Self {
        self.change_vector = Some(change_vector.into());
        self
    }
}

/// Delete a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteCommand {
    pub id: String,
    #[serde(default, serialize_with = "empty_as_null")]
    pub change_vector: Option<String>,
}

impl DeleteCommand {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            change_vector: None,
        }
    }

    pub fn with_change_vector(mut self, change_vector: impl Into<String>) -> Self {
        self.change_vector = Some(change_vector.into());
        self
    }
}

impl From<PutCommand> for Command {
    fn from(cmd: PutCommand) -> Self {
        Command::Put(cmd)
    }
}

impl From<DeleteCommand> for Command {
    fn from(cmd: DeleteCommand) -> Self {
        Command::Delete(cmd)
    }
}

fn empty_as_null<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match value.as_deref() {
        Some(cv) if !cv.is_empty() => serializer.serialize_str(cv),
        _ => serializer.serialize_none(),
    }
}

/// Ordered list of commands sent as one bulk request
///
/// The order is kept in the serialized `Commands` array.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchRequest {
    pub commands: Vec<Command>,
}

impl BatchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(mut self, id: impl Into<String>, document: serde_json::Value) -> Self {
        self.commands.push(PutCommand::new(id, document).into());
        self
    }

    pub fn delete(mut self, id: impl Into<String>) -> Self {
        self.commands.push(DeleteCommand::new(id).into());
        self
    }

    pub fn push(&mut self, command: impl Into<Command>) {
        self.commands.push(command.into());
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Compact JSON body for the bulk endpoint
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<Vec<Command>> for BatchRequest {
    fn from(commands: Vec<Command>) -> Self {
        Self { commands }
    }
}
