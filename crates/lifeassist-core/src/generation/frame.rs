//! Splitting a turn list into provider history and the live message.

use lifeassist_types::chat::ChatTurn;
use lifeassist_types::llm::CompletionRequest;

/// Sent when the newest turn is not a user turn, or is empty.
pub const CONTINUE_PROMPT: &str = "Please continue.";

/// A chat request as the provider sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatFrame {
    /// Prior turns, oldest first. Turns without a role or with empty
    /// content are left out.
    pub history: Vec<ChatTurn>,
    /// The message the provider answers.
    pub message: String,
}

impl ChatFrame {
    /// Frame a conversation for generation.
    ///
    /// Returns `None` for an empty conversation. If the newest turn is a
    /// user turn it becomes the live message and everything before it is
    /// history; otherwise all turns are history and [`CONTINUE_PROMPT`] is
    /// sent. A role-less newest turn counts as a non-user turn.
    pub fn from_turns(turns: &[ChatTurn]) -> Option<Self> {
        let (last, earlier) = turns.split_last()?;

        let (prior, message) = if last.is_user() {
            (earlier, last.content.as_str())
        } else {
            (turns, "")
        };

        let message = if message.is_empty() {
            CONTINUE_PROMPT
        } else {
            message
        };

        Some(Self {
            history: prior
                .iter()
                .filter(|t| t.role.is_some() && !t.content.is_empty())
                .cloned()
                .collect(),
            message: message.to_string(),
        })
    }

    /// Flatten into a provider request: history followed by the live message.
    pub fn into_request(self) -> CompletionRequest {
        let mut messages = self.history;
        messages.push(ChatTurn::user(self.message));
        CompletionRequest {
            model: String::new(),
            messages,
        }
    }
}
