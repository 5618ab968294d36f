//! The three plugin commands: `sendRequest`, `characterContext` and
//! `displayResponse`.

use log::{debug, error, info, warn};
use serde_json::{json, Value};

use crate::engine::host::{EventMap, MessageWindow, TextPrompt};
use crate::engine::llm_client::{ChatTransport, SendMessageRequest};
use crate::engine::word_wrap::{normalize_line_breaks, truncate_words, wrap_text};
use crate::error::PluginError;
use crate::model::args::{CharacterContextArgs, DisplayResponseArgs, SendRequestArgs};
use crate::model::character_context::CharacterContext;
use crate::model::chat_history::{self, HistoryEntry, StoredHistory};
use crate::model::gpt_response::GptResponse;
use crate::model::session::Session;

pub const PROMPT_MESSAGE: &str = "Enter your message:";
pub const PROMPT_DEFAULT: &str = "hi";
pub const FALLBACK_INPUT: &str = "Hi!";

/// A message that has been built and is waiting for the server.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    /// The text actually sent, after truncation.
    pub user_input: String,
    pub history_variable_id: u32,
    pub body: SendMessageRequest,
}

/// Turn the prompt's answer into the text to send. Cancelled or empty
/// answers become [`FALLBACK_INPUT`]; whitespace is sent as typed.
pub fn resolve_prompt_input(answer: Option<String>) -> String {
    let text = answer.map(|a| normalize_line_breaks(&a)).unwrap_or_default();
    if text.is_empty() {
        FALLBACK_INPUT.to_string()
    } else {
        text
    }
}

pub fn ask_player(prompt: &mut dyn TextPrompt) -> String {
    let answer = prompt.prompt(PROMPT_MESSAGE, PROMPT_DEFAULT);
    info!("User Input: {:?}", answer);
    resolve_prompt_input(answer)
}

/// Build the request body for `user_input`.
///
/// Existing history is sent without the character context; the context
/// only goes out with the first message of a conversation.
pub fn build_request(session: &mut Session, args: &SendRequestArgs, user_input: &str) -> PendingRequest {
    let user_input = truncate_words(user_input, args.max_input_words);

    let stored = StoredHistory::decode(session.variables.value(args.history_variable_id));
    let (chat_history, character_context) = match stored {
        StoredHistory::Entries(entries) => (entries, json!({})),
        other => {
            if let StoredHistory::Corrupt(e) = &other {
                warn!(
                    "history in variable {} is unreadable ({e}); starting a new conversation",
                    args.history_variable_id
                );
            }
            let context = session
                .variables
                .value(args.context_variable_id)
                .cloned()
                .filter(crate::model::variables::is_truthy)
                .unwrap_or_else(|| json!({}));
            (Vec::new(), context)
        }
    };

    debug!(
        "contextVariableId content: {:?}",
        session.variables.value(args.context_variable_id)
    );

    let body = SendMessageRequest {
        user_input: user_input.clone(),
        player_name: session.params.player_name.clone(),
        account_id: session.params.player_account_id.clone(),
        chat_history,
        character_context,
    };
    debug!("Request data: {}", serde_json::to_string(&body).unwrap_or_default());

    session.begin_request();

    PendingRequest {
        user_input,
        history_variable_id: args.history_variable_id,
        body,
    }
}

/// Apply the outcome of a request. A failed request is logged and the turn
/// is dropped. Returns whether the reply and the history turn were recorded.
pub fn complete_request(
    session: &mut Session,
    pending: PendingRequest,
    result: Result<GptResponse, PluginError>,
) -> bool {
    session.end_request();

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            error!("Error: {e}");
            return false;
        }
    };
    info!("Received response from server: {:?}", response.content);

    match serde_json::to_value(&response) {
        Ok(slot) => session.variables.set_value(session.response_variable_id(), slot),
        Err(e) => {
            error!("could not store response: {e}");
            return false;
        }
    }

    update_conversation_history(
        session,
        pending.history_variable_id,
        &pending.user_input,
        &response,
    )
}

/// Append the user turn and the reply to the history slot. Entries already
/// there are kept as they are. Returns `false` when the slot holds text that
/// is not JSON, which is left untouched.
pub fn update_conversation_history(
    session: &mut Session,
    history_variable_id: u32,
    user_input: &str,
    response: &GptResponse,
) -> bool {
    let turn = [
        Value::from(HistoryEntry::user(user_input)),
        Value::from(HistoryEntry::assistant(response.content.clone())),
    ];

    let history = match StoredHistory::decode(session.variables.value(history_variable_id)) {
        StoredHistory::Entries(mut entries) => {
            entries.extend(turn);
            entries
        }
        StoredHistory::Empty | StoredHistory::NotAList => turn.to_vec(),
        StoredHistory::Corrupt(e) => {
            error!("Error parsing chat history: {e}");
            return false;
        }
    };

    let slot = chat_history::encode(&Value::Array(history));
    info!("Conversation History (Variable {history_variable_id}):\n{slot}");
    session.variables.set_value(history_variable_id, slot);
    true
}

/// `sendRequest` for hosts that can block: prompt if needed, send, and
/// record the reply. Returns whether a reply was recorded.
pub fn send_request(
    session: &mut Session,
    args: &SendRequestArgs,
    prompt: &mut dyn TextPrompt,
    transport: &dyn ChatTransport,
) -> bool {
    let user_input = if args.needs_prompt() {
        ask_player(prompt)
    } else {
        args.user_input.clone()
    };

    let pending = build_request(session, args, &user_input);
    let result = transport.send_message(&pending.body);
    complete_request(session, pending, result)
}

/// `characterContext`: store the persona record in its variable.
pub fn character_context(
    session: &mut Session,
    args: &CharacterContextArgs,
) -> Result<CharacterContext, PluginError> {
    let context = CharacterContext::from_args(args)?;

    let slot = serde_json::to_value(&context).unwrap_or(Value::Null);
    session.variables.set_value(args.context_variable_id, slot);

    info!("Provided contextVariableId: {}", args.context_variable_id);
    debug!(
        "contextVariableId content: {:?}",
        session.variables.value(args.context_variable_id)
    );
    Ok(context)
}

/// `displayResponse`: show the stored reply in the message window.
/// Does nothing when there is no reply object; returns whether it showed one.
pub fn display_response(
    session: &mut Session,
    args: &DisplayResponseArgs,
    window: &mut dyn MessageWindow,
    map: &mut dyn EventMap,
) -> bool {
    let slot_id = session.response_variable_id();
    let response = match session.variables.value(slot_id) {
        Some(slot @ Value::Object(_)) => match serde_json::from_value::<GptResponse>(slot.clone()) {
            Ok(response) => response,
            Err(e) => {
                warn!("variable {slot_id} does not hold a chat response: {e}");
                return false;
            }
        },
        _ => {
            debug!("no response in variable {slot_id}");
            return false;
        }
    };

    let wrapped = wrap_text(&response.content, args.wrap_text_length);

    window.clear();
    window.set_face_image(&args.actor_image, args.actor_face_index);
    window.set_speaker_name(&args.actor_name);
    window.add(&wrapped);

    if args.event_id > 0 && !map.start_event(args.event_id, args.event_page_id) {
        warn!("event {} not found on this map", args.event_id);
    }

    if let Some(history) = &response.chat_history {
        session
            .variables
            .set_value(args.history_variable_id, chat_history::encode(history));
    }

    true
}
