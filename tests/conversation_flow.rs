use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dialog_craft::engine::commands::{self, PendingRequest};
use dialog_craft::engine::engine::EngineHandle;
use dialog_craft::engine::game_map::GameMap;
use dialog_craft::engine::host::{MessageWindow, TextPrompt};
use dialog_craft::engine::interpreter::Interpreter;
use dialog_craft::engine::llm_client::{ChatTransport, SendMessageRequest};
use dialog_craft::engine::protocol::EngineResponse;
use dialog_craft::model::args::SendRequestArgs;
use dialog_craft::model::chat_history::StoredHistory;
use dialog_craft::model::game_event::demo_events;
use dialog_craft::model::gpt_response::GptResponse;
use dialog_craft::model::plugin_params::PluginParams;
use dialog_craft::model::session::Session;
use dialog_craft::PluginError;

/// Answers every message with a numbered reply and keeps the bodies.
#[derive(Clone, Default)]
struct RecordingServer {
    bodies: Arc<Mutex<Vec<SendMessageRequest>>>,
}

impl ChatTransport for RecordingServer {
    fn send_message(&self, request: &SendMessageRequest) -> Result<GptResponse, PluginError> {
        let mut bodies = self.bodies.lock().unwrap();
        bodies.push(request.clone());
        Ok(GptResponse {
            content: format!("Reply number {} to your words, traveller.", bodies.len()),
            chat_history: None,
        })
    }
}

struct Offline;

impl ChatTransport for Offline {
    fn send_message(&self, _: &SendMessageRequest) -> Result<GptResponse, PluginError> {
        Err(PluginError::Status(503))
    }
}

#[derive(Default)]
struct Window {
    shown: Vec<(String, String)>,
    speaker: String,
}

impl MessageWindow for Window {
    fn clear(&mut self) {
        self.speaker.clear();
    }
    fn set_face_image(&mut self, _: &str, _: u32) {}
    fn set_speaker_name(&mut self, name: &str) {
        self.speaker = name.to_string();
    }
    fn add(&mut self, text: &str) {
        self.shown.push((self.speaker.clone(), text.to_string()));
    }
}

struct Player(Vec<Option<&'static str>>);

impl TextPrompt for Player {
    fn prompt(&mut self, _: &str, _: &str) -> Option<String> {
        if self.0.is_empty() {
            None
        } else {
            self.0.remove(0).map(str::to_string)
        }
    }
}

fn session() -> Session {
    Session::new(PluginParams {
        player_name: "Ayla".into(),
        player_account_id: "acc-7".into(),
        ..PluginParams::default()
    })
}

#[test]
fn demo_event_full_round() {
    let mut session = session();
    let mut map = GameMap::new(demo_events());
    let mut window = Window::default();
    let mut player = Player(vec![Some("Have you seen Alice?")]);
    let server = RecordingServer::default();
    let mut interp = Interpreter::new();

    // page 1: persona + message
    assert!(interp.start_event(&session, &map, 1, 0));
    interp
        .run_blocking(&mut session, &mut window, &mut map, &mut player, &server)
        .unwrap();

    {
        let bodies = server.bodies.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].user_input, "Have you seen Alice?");
        assert!(bodies[0].chat_history.is_empty());
        assert_eq!(bodies[0].character_context, *session.variables.value(12).unwrap());
        assert_eq!(bodies[0].character_context["interests"]["Cars"], 9);
    }

    // history now exists: page 2 autoruns, shows the reply, resets history
    let id = map.autorun_ready(&session.variables).unwrap();
    assert!(interp.start_event(&session, &map, id, 0));
    interp
        .run_blocking(&mut session, &mut window, &mut map, &mut player, &server)
        .unwrap();

    assert_eq!(window.shown.len(), 1);
    assert_eq!(window.shown[0].0, "GPT Wizard");
    assert_eq!(
        window.shown[0].1,
        "Reply number 1 to your words, traveller."
    );
    assert_eq!(session.variables.value(11), Some(&json!(0)));
    assert!(map.autorun_ready(&session.variables).is_none());
}

#[test]
fn wrapped_reply_respects_width() {
    let mut session = session();
    session.variables.set_value(
        6,
        json!({"content": "Many have sought the amulet beneath the old lighthouse"}),
    );
    let mut map = GameMap::default();
    let mut window = Window::default();
    let args = dialog_craft::model::args::DisplayResponseArgs {
        wrap_text_length: 16,
        ..Default::default()
    };

    assert!(commands::display_response(&mut session, &args, &mut window, &mut map));
    for line in window.shown[0].1.lines() {
        assert!(line.chars().count() <= 16, "{line:?}");
    }
}

#[test]
fn history_grows_by_two_per_exchange() {
    let mut session = session();
    let server = RecordingServer::default();
    let mut player = Player(vec![Some("one"), None, Some("three")]);
    let args = SendRequestArgs::default();

    for expected in [2, 4, 6] {
        assert!(commands::send_request(&mut session, &args, &mut player, &server));
        let StoredHistory::Entries(history) =
            StoredHistory::decode(session.variables.value(args.history_variable_id))
        else {
            panic!("no history");
        };
        assert_eq!(history.len(), expected);
    }

    let bodies = server.bodies.lock().unwrap();
    assert_eq!(bodies[1].user_input, "Hi!");
    assert_eq!(bodies[2].chat_history.len(), 4);
}

#[test]
fn offline_server_leaves_state_untouched() {
    let mut session = session();
    let mut player = Player(vec![Some("hello")]);
    let args = SendRequestArgs::default();

    assert!(!commands::send_request(&mut session, &args, &mut player, &Offline));
    assert!(session.variables.is_empty());
}

#[test]
fn worker_thread_delivers_replies() {
    let server = RecordingServer::default();
    let engine = EngineHandle::spawn(server.clone());
    let mut session = session();

    let args = SendRequestArgs {
        user_input: "hello".into(),
        ..SendRequestArgs::default()
    };
    let first = commands::build_request(&mut session, &args, "hello");
    let second = commands::build_request(&mut session, &args, "again");
    assert_eq!(session.in_flight(), 2);

    engine.dispatch(first).map_err(|(_, e)| e).unwrap();
    engine.dispatch(second).map_err(|(_, e)| e).unwrap();

    let mut completed: Vec<PendingRequest> = Vec::new();
    while completed.len() < 2 {
        let Some(EngineResponse::Reply { pending, result }) =
            engine.recv_timeout(Duration::from_secs(5))
        else {
            panic!("worker did not answer");
        };
        completed.push(pending.clone());
        assert!(commands::complete_request(&mut session, pending, result));
    }

    assert_eq!(completed[0].user_input, "hello");
    assert_eq!(completed[1].user_input, "again");
    assert_eq!(session.in_flight(), 0);

    let StoredHistory::Entries(history) = StoredHistory::decode(session.variables.value(11)) else {
        panic!("no history");
    };
    assert_eq!(history.len(), 4);

    engine.shutdown();
}
