use log::{debug, warn};
use std::collections::VecDeque;

use crate::engine::commands::{self, PendingRequest, PROMPT_DEFAULT, PROMPT_MESSAGE};
use crate::engine::game_map::GameMap;
use crate::engine::host::{MessageWindow, TextPrompt};
use crate::engine::llm_client::ChatTransport;
use crate::error::PluginError;
use crate::model::args::{CharacterContextArgs, DisplayResponseArgs, SendRequestArgs};
use crate::model::game_event::{control_value, PluginCommand};
use crate::model::session::Session;

/// Outcome of running one command.
#[derive(Debug)]
pub enum Step {
    /// Nothing left to run.
    Idle,
    Ran(&'static str),
    /// Suspended until the player answers the text prompt.
    NeedsInput(SendRequestArgs),
    /// A request is ready; the host sends it and later calls
    /// `commands::complete_request`.
    Dispatch(PendingRequest),
}

/// Runs event commands in order, suspending at the text prompt.
#[derive(Debug, Default)]
pub struct Interpreter {
    queue: VecDeque<PluginCommand>,
    awaiting: Option<SendRequestArgs>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn setup(&mut self, commands: impl IntoIterator<Item = PluginCommand>) {
        self.queue.extend(commands);
    }

    /// Queue the commands of an event page (page 0: active page).
    pub fn start_event(&mut self, session: &Session, map: &GameMap, event_id: u32, page_id: u32) -> bool {
        match map.commands_for(event_id, page_id, &session.variables) {
            Some(commands) => {
                debug!("starting event {event_id} page {page_id}");
                self.setup(commands);
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        !self.queue.is_empty() || self.awaiting.is_some()
    }

    pub fn step(
        &mut self,
        session: &mut Session,
        window: &mut dyn MessageWindow,
        map: &mut GameMap,
    ) -> Result<Step, PluginError> {
        if let Some(args) = &self.awaiting {
            return Ok(Step::NeedsInput(args.clone()));
        }

        let Some(command) = self.queue.pop_front() else {
            return Ok(Step::Idle);
        };
        let name = command.short_name();
        debug!("running {name}");

        match command {
            PluginCommand::CharacterContext(raw) => {
                commands::character_context(session, &CharacterContextArgs::from_args(&raw))?;
            }

            PluginCommand::SendRequest(raw) => {
                let args = SendRequestArgs::from_args(&raw);
                if args.needs_prompt() {
                    self.awaiting = Some(args.clone());
                    return Ok(Step::NeedsInput(args));
                }
                let input = args.user_input.clone();
                return Ok(Step::Dispatch(commands::build_request(session, &args, &input)));
            }

            PluginCommand::DisplayResponse(raw) => {
                let args = DisplayResponseArgs::from_args(&raw);
                commands::display_response(session, &args, window, map);

                for (event_id, page_id) in map.take_started() {
                    if let Some(cmds) = map.commands_for(event_id, page_id, &session.variables) {
                        self.queue.extend(cmds);
                    }
                }
            }

            PluginCommand::ControlVariable(raw) => match raw.id_or("variableId", 0) {
                0 => warn!("controlVariable without a variableId"),
                id => session.variables.set_value(id, control_value(&raw)),
            },
        }

        Ok(Step::Ran(name))
    }

    /// Continue after the text prompt. `None` answer means cancelled.
    pub fn resume_with_input(
        &mut self,
        session: &mut Session,
        answer: Option<String>,
    ) -> Option<PendingRequest> {
        let args = self.awaiting.take()?;
        let input = commands::resolve_prompt_input(answer);
        Some(commands::build_request(session, &args, &input))
    }

    /// Drive the queue to the end, blocking on the prompt and the network.
    pub fn run_blocking(
        &mut self,
        session: &mut Session,
        window: &mut dyn MessageWindow,
        map: &mut GameMap,
        prompt: &mut dyn TextPrompt,
        transport: &dyn ChatTransport,
    ) -> Result<(), PluginError> {
        loop {
            let pending = match self.step(session, window, map)? {
                Step::Idle => return Ok(()),
                Step::Ran(_) => continue,
                Step::NeedsInput(_) => {
                    let answer = prompt.prompt(PROMPT_MESSAGE, PROMPT_DEFAULT);
                    match self.resume_with_input(session, answer) {
                        Some(pending) => pending,
                        None => continue,
                    }
                }
                Step::Dispatch(pending) => pending,
            };

            let result = transport.send_message(&pending.body);
            commands::complete_request(session, pending, result);
        }
    }
}
