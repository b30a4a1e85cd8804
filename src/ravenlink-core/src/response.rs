use serde_json::{Map, Value};

/// Outcome of one command inside a bulk response, selected by `Type`
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResponse {
    Put(PutCommandResponse),
    Delete(DeleteCommandResponse),
}

/// Result of a PUT command (`@id`, `@change-vector`)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PutCommandResponse {
    pub id: String,
    pub change_vector: String,
}

/// Result of a DELETE command (`Id`, `Deleted`)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeleteCommandResponse {
    pub id: String,
    pub deleted: bool,
}

impl CommandResponse {
    /// Decode one entry of a bulk `Results` array
    ///
    /// Returns `None` when the entry is not an object, has no string `Type`,
    /// or names a command type this client does not know. Missing fields of a
    /// known type fall back to their defaults.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let kind = obj.get("Type")?.as_str()?;

        match kind {
            "PUT" => Some(CommandResponse::Put(PutCommandResponse {
                id: string_field(obj, "@id"),
                change_vector: string_field(obj, "@change-vector"),
            })),
            "DELETE" => Some(CommandResponse::Delete(DeleteCommandResponse {
                id: string_field(obj, "Id"),
                deleted: obj.get("Deleted").and_then(Value::as_bool).unwrap_or(false),
            })),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CommandResponse::Put(_) => "PUT",
            CommandResponse::Delete(_) => "DELETE",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            CommandResponse::Put(r) => &r.id,
            CommandResponse::Delete(r) => &r.id,
        }
    }
}

fn string_field(obj: &Map<String, Value>, name: &str) -> String {
    obj.get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
