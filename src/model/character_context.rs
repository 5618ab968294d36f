use log::error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PluginError;
use crate::model::args::CharacterContextArgs;

/// Persona metadata sent to the chat server with the first message of a
/// conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterContext {
    pub name: String,
    pub age: u32,
    pub personality: Personality,

    #[serde(rename = "background story")]
    pub background_story: String,

    /// Free text describing what the character knows about game events.
    #[serde(rename = "game knowledge")]
    pub game_knowledge: String,

    /// Interest name to weight, e.g. `{"Technology": 7}`.
    pub interests: Map<String, Value>,

    /// 0..=10, how much the character helps the player.
    pub supportiveness: u32,

    #[serde(rename = "maxOutputWords")]
    pub max_output_words: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    /// Usually a list of adjectives, but any JSON value is passed on.
    pub traits: Value,
    #[serde(rename = "dialogueStyle")]
    pub dialogue_style: String,
}

impl CharacterContext {
    /// Assemble the record from raw command arguments.
    ///
    /// Malformed `interests` are logged and replaced by an empty map.
    /// `traits` may be any JSON; text that does not parse fails the command.
    pub fn from_args(args: &CharacterContextArgs) -> Result<Self, PluginError> {
        let traits: Value =
            serde_json::from_str(&args.traits).map_err(PluginError::InvalidTraits)?;

        let interests = match serde_json::from_str::<Value>(&args.interests) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                error!("Error parsing 'interests': expected an object, got {other}");
                Map::new()
            }
            Err(e) => {
                error!("Error parsing 'interests': {e}");
                Map::new()
            }
        };

        Ok(Self {
            name: args.name.clone(),
            age: args.age,
            personality: Personality {
                traits,
                dialogue_style: args.dialogue_style.clone(),
            },
            background_story: args.background_story.clone(),
            game_knowledge: args.events_knowledge.clone(),
            interests,
            supportiveness: args.supportiveness,
            max_output_words: args.max_output_words,
        })
    }
}
