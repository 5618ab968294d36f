use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Game variables keyed by integer id.
///
/// Slots hold arbitrary JSON values: numbers written by event scripts,
/// serialized chat history, the character context object and the last
/// server response all live side by side here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableStore {
    slots: BTreeMap<u32, Value>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, id: u32) -> Option<&Value> {
        self.slots.get(&id)
    }

    pub fn set_value(&mut self, id: u32, value: Value) {
        self.slots.insert(id, value);
    }

    pub fn clear(&mut self, id: u32) {
        self.slots.remove(&id);
    }

    /// Whether the slot holds something the host would treat as "set".
    pub fn is_set(&self, id: u32) -> bool {
        self.value(id).map(is_truthy).unwrap_or(false)
    }

    /// Numeric view of a slot, used by event page conditions.
    pub fn number(&self, id: u32) -> f64 {
        match self.value(id) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::Bool(true)) => 1.0,
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Value)> {
        self.slots.iter().map(|(id, value)| (*id, value))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unset_and_falsy_slots_are_not_set() {
        let mut vars = VariableStore::new();
        assert!(!vars.is_set(11));

        vars.set_value(11, json!(0));
        assert!(!vars.is_set(11));

        vars.set_value(11, json!(""));
        assert!(!vars.is_set(11));

        vars.set_value(11, json!("[]"));
        assert!(vars.is_set(11));

        vars.set_value(12, json!({}));
        assert!(vars.is_set(12));
    }

    #[test]
    fn numeric_view_reads_numbers_and_numeric_strings() {
        let mut vars = VariableStore::new();
        vars.set_value(1, json!(3));
        vars.set_value(2, json!(" 7 "));
        vars.set_value(3, json!({"a": 1}));

        assert_eq!(vars.number(1), 3.0);
        assert_eq!(vars.number(2), 7.0);
        assert_eq!(vars.number(3), 0.0);
        assert_eq!(vars.number(4), 0.0);
    }

    #[test]
    fn clear_removes_slot() {
        let mut vars = VariableStore::new();
        vars.set_value(6, json!({"content": "hi"}));
        vars.clear(6);
        assert!(vars.value(6).is_none());
        assert!(vars.is_empty());
    }
}
