use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The chat server's reply for one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GptResponse {
    #[serde(default)]
    pub content: String,

    /// Present when the server keeps its own copy of the conversation.
    /// Its shape is the server's business; it is stored untouched.
    #[serde(rename = "chatHistory", default, skip_serializing_if = "Option::is_none")]
    pub chat_history: Option<Value>,
}

/// Envelope around [`GptResponse`] on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerReply {
    pub response: GptResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_without_history() {
        let reply: ServerReply =
            serde_json::from_str(r#"{"response": {"content": "Greetings, traveller."}}"#).unwrap();
        assert_eq!(reply.response.content, "Greetings, traveller.");
        assert!(reply.response.chat_history.is_none());
    }

    #[test]
    fn reply_with_history() {
        let reply: ServerReply = serde_json::from_str(
            r#"{"response": {"content": "Yes.", "chatHistory": [{"role": "user", "content": "Really?"}]}}"#,
        )
        .unwrap();
        let history = reply.response.chat_history.unwrap();
        assert_eq!(history[0]["content"], "Really?");
    }

    #[test]
    fn unknown_history_roles_do_not_break_the_reply() {
        let reply: ServerReply = serde_json::from_str(
            r#"{"response": {"content": "hi", "chatHistory": [
                {"role": "tool", "content": "lookup", "name": "inventory"},
                {"content": "no role at all"}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(reply.response.content, "hi");

        let history = reply.response.chat_history.unwrap();
        assert_eq!(history[0]["role"], "tool");
        assert_eq!(history[0]["name"], "inventory");
        assert!(history[1].get("role").is_none());
    }
}
