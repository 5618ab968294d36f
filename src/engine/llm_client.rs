use log::debug;
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;

use crate::error::PluginError;
use crate::model::chat_history::ChatHistory;
use crate::model::gpt_response::{GptResponse, ServerReply};
use crate::model::plugin_params::PluginParams;

/// Body of one chat message POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub user_input: String,
    pub player_name: String,
    pub account_id: String,
    pub chat_history: ChatHistory,
    pub character_context: Value,
}

/// Anything that can deliver a message to the chat server.
pub trait ChatTransport: Send {
    fn send_message(&self, request: &SendMessageRequest) -> Result<GptResponse, PluginError>;
}

pub struct HttpChatClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpChatClient {
    pub fn new(params: &PluginParams) -> Result<Self, PluginError> {
        let client = Client::builder().build()?;
        let api_key = Some(params.api_key.trim().to_string()).filter(|k| !k.is_empty());

        Ok(Self {
            client,
            endpoint: params.endpoint.clone(),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChatTransport for HttpChatClient {
    fn send_message(&self, request: &SendMessageRequest) -> Result<GptResponse, PluginError> {
        let mut req = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PluginError::Status(status.as_u16()));
        }

        let reply: ServerReply = resp.json()?;
        debug!("Received response from server: {:?}", reply.response);
        Ok(reply.response)
    }
}
