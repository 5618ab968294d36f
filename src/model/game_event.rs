use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use crate::model::args::PluginArgs;
use crate::model::variables::VariableStore;

/// A plugin command as it appears in an event page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "camelCase")]
pub enum PluginCommand {
    SendRequest(PluginArgs),
    CharacterContext(PluginArgs),
    DisplayResponse(PluginArgs),
    /// Set a variable slot; `variableId` and `value` (JSON).
    ControlVariable(PluginArgs),
}

impl PluginCommand {
    pub fn short_name(&self) -> &'static str {
        match self {
            PluginCommand::SendRequest(_) => "sendRequest",
            PluginCommand::CharacterContext(_) => "characterContext",
            PluginCommand::DisplayResponse(_) => "displayResponse",
            PluginCommand::ControlVariable(_) => "controlVariable",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Runs when the player interacts with the event.
    #[default]
    Action,
    /// Runs by itself as soon as the page becomes active.
    Autorun,
}

/// Page condition on one variable. Without `at_least` the slot only has
/// to be set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCondition {
    pub variable_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_least: Option<f64>,
}

impl VariableCondition {
    pub fn holds(&self, vars: &VariableStore) -> bool {
        match self.at_least {
            None => vars.is_set(self.variable_id),
            Some(bound) => vars.number(self.variable_id) >= bound,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<VariableCondition>,
    #[serde(default)]
    pub trigger: Trigger,
    #[serde(default)]
    pub commands: Vec<PluginCommand>,
}

impl EventPage {
    pub fn is_enabled(&self, vars: &VariableStore) -> bool {
        self.condition.as_ref().map_or(true, |c| c.holds(vars))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub pages: Vec<EventPage>,
}

impl GameEvent {
    /// 1-based number of the page that currently applies: the last page
    /// whose condition holds.
    pub fn active_page(&self, vars: &VariableStore) -> Option<u32> {
        self.pages
            .iter()
            .rposition(|page| page.is_enabled(vars))
            .map(|index| index as u32 + 1)
    }

    pub fn page(&self, number: u32) -> Option<&EventPage> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        self.pages.get(index)
    }
}

pub fn load_events(path: &Path) -> anyhow::Result<Vec<GameEvent>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading event script {}", path.display()))?;
    let events = serde_json::from_str(&text)
        .with_context(|| format!("parsing event script {}", path.display()))?;
    Ok(events)
}

/// One talking NPC, set up the way the plugin's usage notes describe:
/// page 1 stores the persona and sends the player's message, page 2 runs
/// once history exists, shows the reply and resets the history slot.
pub fn demo_events() -> Vec<GameEvent> {
    let page_one = EventPage {
        condition: None,
        trigger: Trigger::Action,
        commands: vec![
            PluginCommand::CharacterContext(
                PluginArgs::new()
                    .with("name", "GPT Wizard")
                    .with("age", 17)
                    .with("traits", r#"["friendly", "optimistic", "adventurous"]"#)
                    .with("dialogueStyle", "casual")
                    .with(
                        "backgroundStory",
                        "John is a skilled adventurer who has traveled the world in search of \
                         hidden treasures. He is always eager to help others and believes in \
                         the power of friendship.",
                    )
                    .with(
                        "eventsKnowledge",
                        r#"{"Event 1": "Crime scene", "Event 2": "Alice affair with Joseph"}"#,
                    )
                    .with("interests", r#"{"Technology": 7, "Cars": 9}"#)
                    .with("supportiveness", 10)
                    .with("maxOutputWords", 100)
                    .with("contextVariableId", 12),
            ),
            PluginCommand::SendRequest(
                PluginArgs::new()
                    .with("userInput", "")
                    .with("maxInputWords", 50)
                    .with("historyVariableId", 11),
            ),
        ],
    };

    let page_two = EventPage {
        condition: Some(VariableCondition {
            variable_id: 11,
            at_least: None,
        }),
        trigger: Trigger::Autorun,
        commands: vec![
            PluginCommand::DisplayResponse(
                PluginArgs::new()
                    .with("eventId", 0)
                    .with("eventPageId", 0)
                    .with("actorImage", "Actor1")
                    .with("actorName", "GPT Wizard")
                    .with("wrapTextLength", 40)
                    .with("historyVariableId", 11),
            ),
            PluginCommand::ControlVariable(
                PluginArgs::new()
                    .with("variableId", 11)
                    .with("value", Value::from(0)),
            ),
        ],
    };

    vec![GameEvent {
        id: 1,
        name: "Wizard".into(),
        pages: vec![page_one, page_two],
    }]
}

/// Value of a `controlVariable` command: JSON when it parses, text otherwise.
pub fn control_value(args: &PluginArgs) -> Value {
    match args.text("value") {
        None => json!(0),
        Some(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
    }
}
