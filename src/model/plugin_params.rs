use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_GPT_RESPONSE_VARIABLE_ID: u32 = 6;
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3002/api/v1/chat/send-message";
pub const ENDPOINT_ENV: &str = "DIALOG_CRAFT_ENDPOINT";

/// Static parameters of the plugin, set once per game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginParams {
    pub api_key: String,
    pub gpt_response_variable_id: u32,
    pub player_name: String,
    pub player_account_id: String,
    pub endpoint: String,
}

impl Default for PluginParams {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            gpt_response_variable_id: DEFAULT_GPT_RESPONSE_VARIABLE_ID,
            player_name: String::new(),
            player_account_id: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl PluginParams {
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading plugin parameters from {}", path.display()))?;
        let params: PluginParams = serde_json::from_str(&text)
            .with_context(|| format!("parsing plugin parameters in {}", path.display()))?;
        Ok(params.normalized())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Replace values the host would reject with their defaults.
    pub fn normalized(mut self) -> Self {
        if self.gpt_response_variable_id == 0 {
            self.gpt_response_variable_id = DEFAULT_GPT_RESPONSE_VARIABLE_ID;
        }
        if self.endpoint.trim().is_empty() {
            self.endpoint = DEFAULT_ENDPOINT.to_string();
        }
        self
    }

    /// Apply the endpoint override from the environment, if any.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                self.endpoint = endpoint;
            }
        }
        self
    }
}
