/// What the message window currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameMessage {
    pub face_name: String,
    pub face_index: u32,
    pub speaker_name: String,
    pub text: String,
}
