use log::{debug, info};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::engine::commands::PendingRequest;
use crate::engine::llm_client::ChatTransport;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::error::PluginError;

/// Background worker that performs the chat POSTs one at a time.
pub struct Engine<T: ChatTransport> {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    transport: T,
}

impl<T: ChatTransport> Engine<T> {
    pub fn new(rx: Receiver<EngineCommand>, tx: Sender<EngineResponse>, transport: T) -> Self {
        Self { rx, tx, transport }
    }

    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                EngineCommand::SendMessage(pending) => {
                    info!("Sending request to the server...");
                    let result = self.transport.send_message(&pending.body);

                    if self.tx.send(EngineResponse::Reply { pending, result }).is_err() {
                        break;
                    }
                }
                EngineCommand::Shutdown => break,
            }
        }
        debug!("request worker stopped");
    }
}

/// Host-side end of a running [`Engine`].
pub struct EngineHandle {
    cmd_tx: Sender<EngineCommand>,
    resp_rx: Receiver<EngineResponse>,
    thread: Option<JoinHandle<()>>,
}

impl EngineHandle {
    pub fn spawn<T: ChatTransport + 'static>(transport: T) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        let thread = thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx, transport);
            engine.run();
        });

        Self {
            cmd_tx,
            resp_rx,
            thread: Some(thread),
        }
    }

    /// Queue a prepared request. On failure the request is handed back so
    /// the caller can still complete it.
    pub fn dispatch(&self, pending: PendingRequest) -> Result<(), (PendingRequest, PluginError)> {
        if let Err(mpsc::SendError(EngineCommand::SendMessage(pending))) =
            self.cmd_tx.send(EngineCommand::SendMessage(pending))
        {
            return Err((pending, PluginError::EngineStopped));
        }
        Ok(())
    }

    pub fn try_recv(&self) -> Option<EngineResponse> {
        self.resp_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineResponse> {
        match self.resp_rx.recv_timeout(timeout) {
            Ok(resp) => Some(resp),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Stop the worker after the request it is currently sending, if any.
    pub fn shutdown(mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
    }
}
