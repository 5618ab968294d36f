use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::model::variables::VariableStore;

pub const SAVE_VERSION: u32 = 1;

/// Persisted game variables, including the conversation slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSave {
    pub version: u32,
    pub variables: VariableStore,
}

impl GameSave {
    pub fn new(variables: VariableStore) -> Self {
        Self {
            version: SAVE_VERSION,
            variables,
        }
    }

    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing save {}", path.display()))
    }

    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading save {}", path.display()))?;
        let save: GameSave = serde_json::from_str(&text)
            .with_context(|| format!("parsing save {}", path.display()))?;
        if save.version > SAVE_VERSION {
            bail!("save version {} is newer than supported {}", save.version, SAVE_VERSION);
        }
        Ok(save)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn variables_survive_a_save() {
        let mut vars = VariableStore::new();
        vars.set_value(11, json!("[{\"role\":\"user\",\"content\":\"hi\"}]"));
        vars.set_value(12, json!({"name": "GPT Wizard"}));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        GameSave::new(vars.clone()).write(&path).unwrap();

        let loaded = GameSave::read(&path).unwrap();
        assert_eq!(loaded.variables, vars);
    }

    #[test]
    fn newer_saves_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        fs::write(&path, r#"{"version": 99, "variables": {"slots": {}}}"#).unwrap();
        assert!(GameSave::read(&path).is_err());
    }
}
