//! Conversation sessions.

use llm::Message;

/// One conversation: the ordered history sent to the model on every call.
///
/// The history starts with a single system message, only grows while turns
/// run, and goes back to that single message on [`Session::reset`].
#[derive(Debug, Clone)]
pub struct Session {
    system_prompt: String,
    history: Vec<Message>,
}

impl Session {
    /// Start a new chat with the given system prompt.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let system_prompt = system_prompt.into();
        Self {
            history: vec![Message::system(&system_prompt)],
            system_prompt,
        }
    }

    /// Start the chat over.
    pub fn reset(&mut self) {
        self.history.clear();
        self.history.push(Message::system(&self.system_prompt));
    }

    /// The system prompt this session starts from.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// The conversation so far, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Number of messages in the history.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether the history is empty, which only a fresh session is not.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.history.push(message);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new("You are a helpful AI assistant")
    }
}
