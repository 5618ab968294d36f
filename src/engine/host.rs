//! Collaborators the hosting game provides to the plugin commands.

/// The dialogue box.
pub trait MessageWindow {
    fn clear(&mut self);
    fn set_face_image(&mut self, face_name: &str, face_index: u32);
    fn set_speaker_name(&mut self, name: &str);
    fn add(&mut self, text: &str);
}

pub trait EventMap {
    /// Ask the map to run `event_id`. Page 0 means the event's active page.
    /// Returns false when no such event exists.
    fn start_event(&mut self, event_id: u32, page_id: u32) -> bool;
}

/// Modal text input. `None` when the player cancels.
pub trait TextPrompt {
    fn prompt(&mut self, message: &str, default: &str) -> Option<String>;
}
