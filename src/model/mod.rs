pub mod args;
pub mod character_context;
pub mod chat_history;
pub mod game_event;
pub mod game_save;
pub mod gpt_response;
pub mod message;
pub mod plugin_params;
pub mod session;
pub mod variables;
