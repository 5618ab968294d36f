use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const DEFAULT_MAX_INPUT_WORDS: usize = 50;
pub const DEFAULT_HISTORY_VARIABLE_ID: u32 = 11;
pub const DEFAULT_CONTEXT_VARIABLE_ID: u32 = 12;
pub const DEFAULT_MAX_OUTPUT_WORDS: u32 = 100;
pub const DEFAULT_WRAP_TEXT_LENGTH: usize = 40;
pub const DEFAULT_FACE_INDEX: u32 = 5;

/// Loosely typed arguments of a plugin command, as an event script
/// author writes them. Values may be strings or plain JSON numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginArgs(BTreeMap<String, Value>);

impl PluginArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Text form of an argument. Non-string JSON is rendered back to text.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Text argument, treating a missing or empty value as `default`.
    pub fn text_or(&self, key: &str, default: &str) -> String {
        match self.text(key) {
            Some(s) if !s.is_empty() => s,
            _ => default.to_string(),
        }
    }

    /// Integer argument; missing, malformed and zero values all fall back
    /// to `default`.
    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        match self.text(key).as_deref().and_then(parse_int) {
            Some(0) | None => default,
            Some(n) => n,
        }
    }

    pub fn id_or(&self, key: &str, default: u32) -> u32 {
        u32::try_from(self.int_or(key, default as i64)).unwrap_or(default)
    }

    pub fn count_or(&self, key: &str, default: usize) -> usize {
        usize::try_from(self.int_or(key, default as i64)).unwrap_or(default)
    }
}

/// Leading-integer parse: optional sign then digits, trailing junk ignored.
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Arguments of the `sendRequest` command.
#[derive(Debug, Clone, PartialEq)]
pub struct SendRequestArgs {
    pub user_input: String,
    pub max_input_words: usize,
    pub history_variable_id: u32,
    pub context_variable_id: u32,
}

impl Default for SendRequestArgs {
    fn default() -> Self {
        Self {
            user_input: String::new(),
            max_input_words: DEFAULT_MAX_INPUT_WORDS,
            history_variable_id: DEFAULT_HISTORY_VARIABLE_ID,
            context_variable_id: DEFAULT_CONTEXT_VARIABLE_ID,
        }
    }
}

impl SendRequestArgs {
    pub fn from_args(args: &PluginArgs) -> Self {
        Self {
            user_input: args.text("userInput").unwrap_or_default().trim().to_string(),
            max_input_words: args.count_or("maxInputWords", DEFAULT_MAX_INPUT_WORDS),
            history_variable_id: args.id_or("historyVariableId", DEFAULT_HISTORY_VARIABLE_ID),
            context_variable_id: args.id_or("contextVariableId", DEFAULT_CONTEXT_VARIABLE_ID),
        }
    }

    /// The player has to be asked when the event supplied no text.
    pub fn needs_prompt(&self) -> bool {
        self.user_input.trim().is_empty()
    }
}

/// Arguments of the `characterContext` command. `traits` and `interests`
/// stay raw JSON text here; the handler decides how strictly to parse them.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterContextArgs {
    pub name: String,
    pub age: u32,
    pub traits: String,
    pub dialogue_style: String,
    pub background_story: String,
    pub events_knowledge: String,
    pub interests: String,
    pub supportiveness: u32,
    pub max_output_words: u32,
    pub context_variable_id: u32,
}

impl Default for CharacterContextArgs {
    fn default() -> Self {
        Self::from_args(&PluginArgs::new())
    }
}

impl CharacterContextArgs {
    pub fn from_args(args: &PluginArgs) -> Self {
        Self {
            name: args.text("name").unwrap_or_default(),
            age: u32::try_from(args.int_or("age", 0)).unwrap_or(0),
            traits: args.text_or("traits", "[]"),
            dialogue_style: args.text("dialogueStyle").unwrap_or_default(),
            background_story: args.text("backgroundStory").unwrap_or_default(),
            events_knowledge: args.text("eventsKnowledge").unwrap_or_default(),
            interests: args.text_or("interests", "{}"),
            supportiveness: u32::try_from(args.int_or("supportiveness", 0)).unwrap_or(0),
            max_output_words: args.id_or("maxOutputWords", DEFAULT_MAX_OUTPUT_WORDS),
            context_variable_id: args.id_or("contextVariableId", DEFAULT_CONTEXT_VARIABLE_ID),
        }
    }
}

/// Arguments of the `displayResponse` command.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayResponseArgs {
    pub event_id: u32,
    pub event_page_id: u32,
    pub actor_image: String,
    pub actor_face_index: u32,
    pub actor_name: String,
    pub wrap_text_length: usize,
    pub history_variable_id: u32,
}

impl Default for DisplayResponseArgs {
    fn default() -> Self {
        Self::from_args(&PluginArgs::new())
    }
}

impl DisplayResponseArgs {
    pub fn from_args(args: &PluginArgs) -> Self {
        Self {
            event_id: args.id_or("eventId", 0),
            event_page_id: args.id_or("eventPageId", 0),
            actor_image: args.text("actorImage").unwrap_or_default(),
            // face sheets have 8 cells, index 0 is a valid face
            actor_face_index: match args.text("actorFaceIndex").as_deref().and_then(parse_int) {
                Some(n @ 0..=7) => n as u32,
                _ => DEFAULT_FACE_INDEX,
            },
            actor_name: args.text("actorName").unwrap_or_default(),
            wrap_text_length: args.count_or("wrapTextLength", DEFAULT_WRAP_TEXT_LENGTH),
            history_variable_id: args.id_or("historyVariableId", DEFAULT_HISTORY_VARIABLE_ID),
        }
    }
}
