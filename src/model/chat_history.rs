use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn this plugin adds to a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

impl HistoryEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

impl From<HistoryEntry> for Value {
    fn from(entry: HistoryEntry) -> Self {
        json!({ "role": entry.role, "content": entry.content })
    }
}

/// Conversation turns. The server owns their shape, so entries are kept
/// as raw JSON and passed back untouched.
pub type ChatHistory = Vec<Value>;

/// What a history slot turned out to contain.
#[derive(Debug)]
pub enum StoredHistory {
    Empty,
    Entries(ChatHistory),
    /// Valid JSON that is not a list.
    NotAList,
    /// Text that is not JSON at all.
    Corrupt(serde_json::Error),
}

impl StoredHistory {
    /// Decode a history slot. History is normally stored as JSON text;
    /// a slot an event script filled with a raw value is read as-is.
    pub fn decode(slot: Option<&Value>) -> Self {
        let Some(value) = slot.filter(|v| crate::model::variables::is_truthy(v)) else {
            return StoredHistory::Empty;
        };

        let parsed = match value {
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(v) => v,
                Err(e) => return StoredHistory::Corrupt(e),
            },
            other => other.clone(),
        };

        match parsed {
            Value::Array(entries) => StoredHistory::Entries(entries),
            _ => StoredHistory::NotAList,
        }
    }
}

/// Slot representation of a history: its JSON text.
pub fn encode(history: &Value) -> Value {
    Value::String(history.to_string())
}
