pub mod commands;
pub mod engine;
pub mod game_map;
pub mod host;
pub mod interpreter;
pub mod llm_client;
pub mod protocol;
pub mod word_wrap;
