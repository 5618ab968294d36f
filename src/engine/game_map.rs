use std::collections::BTreeMap;

use crate::engine::host::EventMap;
use crate::model::game_event::{GameEvent, PluginCommand, Trigger};
use crate::model::variables::VariableStore;

/// The events on the current map.
#[derive(Debug, Clone, Default)]
pub struct GameMap {
    events: BTreeMap<u32, GameEvent>,
    started: Vec<(u32, u32)>,
}

impl GameMap {
    pub fn new(events: Vec<GameEvent>) -> Self {
        Self {
            events: events.into_iter().map(|e| (e.id, e)).collect(),
            started: Vec::new(),
        }
    }

    pub fn event(&self, id: u32) -> Option<&GameEvent> {
        self.events.get(&id)
    }

    pub fn events(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.values()
    }

    /// Events started since the last call, as `(event_id, page_id)`.
    pub fn take_started(&mut self) -> Vec<(u32, u32)> {
        std::mem::take(&mut self.started)
    }

    /// Commands of an event page. Page 0 resolves to the active page.
    pub fn commands_for(
        &self,
        event_id: u32,
        page_id: u32,
        vars: &VariableStore,
    ) -> Option<Vec<PluginCommand>> {
        let event = self.event(event_id)?;
        let page_number = if page_id == 0 {
            event.active_page(vars)?
        } else {
            page_id
        };
        event.page(page_number).map(|page| page.commands.clone())
    }

    /// First event whose active page runs by itself.
    pub fn autorun_ready(&self, vars: &VariableStore) -> Option<u32> {
        self.events().find_map(|event| {
            let page = event.page(event.active_page(vars)?)?;
            (page.trigger == Trigger::Autorun && !page.commands.is_empty()).then_some(event.id)
        })
    }
}

impl EventMap for GameMap {
    fn start_event(&mut self, event_id: u32, page_id: u32) -> bool {
        if self.events.contains_key(&event_id) {
            self.started.push((event_id, page_id));
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::game_event::demo_events;
    use serde_json::json;

    #[test]
    fn start_records_known_events_only() {
        let mut map = GameMap::new(demo_events());
        assert!(map.start_event(1, 2));
        assert!(!map.start_event(9, 0));
        assert_eq!(map.take_started(), vec![(1, 2)]);
        assert!(map.take_started().is_empty());
    }

    #[test]
    fn page_zero_follows_conditions() {
        let map = GameMap::new(demo_events());
        let mut vars = VariableStore::new();

        let first = map.commands_for(1, 0, &vars).unwrap();
        assert_eq!(first[0].short_name(), "characterContext");
        assert!(map.autorun_ready(&vars).is_none());

        vars.set_value(11, json!("[]"));
        let second = map.commands_for(1, 0, &vars).unwrap();
        assert_eq!(second[0].short_name(), "displayResponse");
        assert_eq!(map.autorun_ready(&vars), Some(1));
    }
}
