use eframe::egui;
use log::{error, info};
use std::path::Path;

use dialog_craft::engine::commands::{self, PendingRequest};
use dialog_craft::engine::engine::EngineHandle;
use dialog_craft::engine::game_map::GameMap;
use dialog_craft::engine::host::MessageWindow;
use dialog_craft::engine::interpreter::{Interpreter, Step};
use dialog_craft::engine::llm_client::HttpChatClient;
use dialog_craft::engine::protocol::EngineResponse;
use dialog_craft::model::game_event::{demo_events, load_events, GameEvent};
use dialog_craft::model::game_save::GameSave;
use dialog_craft::model::message::GameMessage;
use dialog_craft::model::plugin_params::PluginParams;
use dialog_craft::model::session::Session;

use crate::ui::center_panel::draw_center_panel;
use crate::ui::faces::FaceCache;
use crate::ui::left_panel::draw_left_panel;
use crate::ui::right_panel::draw_right_panel;
use crate::ui::settings::UiSettings;
use crate::ui::settings_io;

/// Commands run per frame before yielding back to egui.
const STEPS_PER_FRAME: usize = 32;

/* =========================
   Message box
   ========================= */

/// The game's dialogue box. Stays open until the player dismisses it;
/// the interpreter waits meanwhile.
#[derive(Default)]
pub struct MessageBox {
    pub message: GameMessage,
    pub visible: bool,
}

impl MessageWindow for MessageBox {
    fn clear(&mut self) {
        self.message = GameMessage::default();
    }

    fn set_face_image(&mut self, face_name: &str, face_index: u32) {
        self.message.face_name = face_name.to_string();
        self.message.face_index = face_index;
    }

    fn set_speaker_name(&mut self, name: &str) {
        self.message.speaker_name = name.to_string();
    }

    fn add(&mut self, text: &str) {
        if !self.message.text.is_empty() {
            self.message.text.push('\n');
        }
        self.message.text.push_str(text);
        self.visible = true;
    }
}

/* =========================
   UI State
   ========================= */

#[derive(Default)]
pub struct UiState {
    pub params_draft: PluginParams,
    pub prompt_text: String,
    pub prompt_open: bool,
    pub status: Option<String>,
}

/* =========================
   App
   ========================= */

pub struct MyApp {
    pub ui: UiState,
    pub settings: UiSettings,
    pub session: Session,
    pub map: GameMap,
    pub message_box: MessageBox,
    pub faces: FaceCache,
    interpreter: Interpreter,
    engine: Option<EngineHandle>,
}

impl MyApp {
    pub fn new(params: PluginParams, settings: UiSettings) -> Self {
        let events = match &settings.event_script {
            Some(path) => load_events(path).unwrap_or_else(|e| {
                error!("{e:#}; using the demo event");
                demo_events()
            }),
            None => demo_events(),
        };
        let mut app = Self {
            ui: UiState {
                params_draft: params.clone(),
                ..Default::default()
            },
            settings,
            session: Session::new(params),
            map: GameMap::new(events),
            message_box: MessageBox::default(),
            faces: FaceCache::default(),
            interpreter: Interpreter::new(),
            engine: None,
        };
        app.restart_engine();
        app
    }

    fn restart_engine(&mut self) {
        self.retire_engine();
        match HttpChatClient::new(&self.session.params) {
            Ok(client) => {
                info!("chat endpoint: {}", client.endpoint());
                self.engine = Some(EngineHandle::spawn(client));
            }
            Err(e) => self.report(format!("Could not create HTTP client: {e}")),
        }
    }

    /// Apply replies the old worker already delivered, then give up on the
    /// rest; the worker stops when its handle drops.
    fn retire_engine(&mut self) {
        self.drain_replies();
        self.engine = None;
        let lost = self.session.abandon_in_flight();
        if lost > 0 {
            self.report(format!("{lost} message(s) lost while restarting the chat client"));
        }
    }

    pub fn persist_settings(&mut self) {
        if let Err(e) = settings_io::save_settings(&self.settings) {
            self.report(format!("{e:#}"));
        }
    }

    pub fn report(&mut self, status: String) {
        error!("{status}");
        self.ui.status = Some(status);
    }

    pub fn apply_params(&mut self) {
        let params = self.ui.params_draft.clone().normalized();
        if let Err(e) = settings_io::save_params(&params) {
            self.report(format!("{e:#}"));
        }
        self.ui.params_draft = params.clone();
        self.session.params = params;
        self.restart_engine();
    }

    pub fn load_event_script(&mut self, path: &Path) {
        match load_events(path) {
            Ok(events) => self.replace_events(events, Some(path)),
            Err(e) => self.report(format!("{e:#}")),
        }
    }

    fn replace_events(&mut self, events: Vec<GameEvent>, path: Option<&Path>) {
        self.map = GameMap::new(events);
        self.interpreter = Interpreter::new();
        self.settings.event_script = path.map(Path::to_path_buf);
        self.persist_settings();
    }

    pub fn use_demo_events(&mut self) {
        self.replace_events(demo_events(), None);
    }

    pub fn save_game(&mut self, path: &Path) {
        if let Err(e) = GameSave::new(self.session.variables.clone()).write(path) {
            self.report(format!("{e:#}"));
        }
    }

    pub fn load_game(&mut self, path: &Path) {
        match GameSave::read(path) {
            Ok(save) => self.session.variables = save.variables,
            Err(e) => self.report(format!("{e:#}")),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.interpreter.is_running() || self.message_box.visible
    }

    /// Player interacts with an event.
    pub fn talk_to(&mut self, event_id: u32) {
        if self.is_busy() {
            return;
        }
        if !self
            .interpreter
            .start_event(&self.session, &self.map, event_id, 0)
        {
            self.report(format!("Event {event_id} has no page to run"));
        }
    }

    pub fn dismiss_message(&mut self) {
        self.message_box.visible = false;
    }

    pub fn submit_prompt(&mut self, answer: Option<String>) {
        self.ui.prompt_open = false;
        self.ui.prompt_text.clear();
        if let Some(pending) = self.interpreter.resume_with_input(&mut self.session, answer) {
            self.dispatch(pending);
        }
    }

    fn dispatch(&mut self, pending: PendingRequest) {
        let failed = match &self.engine {
            Some(engine) => engine.dispatch(pending).err(),
            None => Some((pending, dialog_craft::PluginError::EngineStopped)),
        };
        if let Some((pending, e)) = failed {
            commands::complete_request(&mut self.session, pending, Err(e));
        }
    }

    fn drain_replies(&mut self) {
        let Some(engine) = &self.engine else {
            return;
        };
        let mut replies = Vec::new();
        while let Some(resp) = engine.try_recv() {
            replies.push(resp);
        }

        for EngineResponse::Reply { pending, result } in replies {
            if let Err(e) = &result {
                self.ui.status = Some(format!("The character did not answer: {e}"));
            }
            commands::complete_request(&mut self.session, pending, result);
        }
    }

    fn pump_interpreter(&mut self) {
        for _ in 0..STEPS_PER_FRAME {
            if self.message_box.visible {
                break;
            }

            if !self.interpreter.is_running() {
                match self.map.autorun_ready(&self.session.variables) {
                    Some(id) => {
                        self.interpreter
                            .start_event(&self.session, &self.map, id, 0);
                    }
                    None => break,
                }
            }

            match self
                .interpreter
                .step(&mut self.session, &mut self.message_box, &mut self.map)
            {
                Ok(Step::Idle) => break,
                Ok(Step::Ran(_)) => {}
                Ok(Step::NeedsInput(_)) => {
                    self.ui.prompt_open = true;
                    break;
                }
                Ok(Step::Dispatch(pending)) => self.dispatch(pending),
                Err(e) => self.report(format!("Plugin command failed: {e}")),
            }
        }
    }
}

/* =========================
   egui App
   ========================= */

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);

        self.drain_replies();
        self.pump_interpreter();

        draw_left_panel(ctx, self);
        draw_right_panel(ctx, self);
        draw_center_panel(ctx, self);

        if self.session.in_flight() > 0 {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_box_collects_lines_and_opens() {
        let mut mb = MessageBox::default();
        mb.clear();
        mb.set_face_image("Actor1", 5);
        mb.set_speaker_name("GPT Wizard");
        mb.add("the quick\nbrown fox");

        assert!(mb.visible);
        assert_eq!(mb.message.face_index, 5);
        assert_eq!(mb.message.text, "the quick\nbrown fox");
    }

    #[test]
    fn restarting_the_client_forgets_unanswered_requests() {
        let mut app = MyApp::new(PluginParams::default(), UiSettings::default());
        let args = dialog_craft::model::args::SendRequestArgs::default();
        commands::build_request(&mut app.session, &args, "hello");
        assert_eq!(app.session.in_flight(), 1);

        app.restart_engine();

        assert_eq!(app.session.in_flight(), 0);
        assert!(app.ui.status.as_deref().unwrap_or_default().contains("1 message(s) lost"));
        assert!(app.engine.is_some());
    }
}
