use crate::engine::commands::PendingRequest;
use crate::error::PluginError;
use crate::model::gpt_response::GptResponse;

pub enum EngineCommand {
    SendMessage(PendingRequest),
    Shutdown,
}

pub enum EngineResponse {
    /// The network call for `pending` finished; the host applies it to the
    /// session with `complete_request`.
    Reply {
        pending: PendingRequest,
        result: Result<GptResponse, PluginError>,
    },
}
