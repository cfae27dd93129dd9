//! UI-agnostic conversation state
//!
//! The conversation is an append-only message log plus a pending flag.
//! `submit` and `resolve` are the only ways to change it, which keeps at most
//! one webhook call in flight at any time.

use uuid::Uuid;

use crate::format::format_response;
use crate::prompt::{build_prompt, FORMATTING_INSTRUCTIONS};
use crate::webhook::{WebhookClient, WebhookError};

/// Shown in the thread when a webhook call fails.
pub const ERROR_REPLY: &str = "Sorry, I encountered an error processing your request.";

/// Transient notice for the UI when a webhook call fails.
pub const FAILURE_NOTICE: &str = "Failed to get response. Please try again.";

/// A chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: String,
    text: String,
    is_user: bool,
}

impl Message {
    fn new(text: String, is_user: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text,
            is_user,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_user(&self) -> bool {
        self.is_user
    }
}

/// An accepted submission: the full prompt to send to the webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub prompt: String,
}

/// What `resolve` did with a finished webhook call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A bot reply was appended.
    Replied,
    /// The fixed error reply was appended; show `FAILURE_NOTICE`.
    Failed,
    /// Nothing was pending, so nothing was appended.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    pending: bool,
    instructions: String,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self::with_instructions(FORMATTING_INSTRUCTIONS)
    }

    pub fn with_instructions(instructions: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            pending: false,
            instructions: instructions.into(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// True while a webhook call is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn can_submit(&self, input: &str) -> bool {
        !self.pending && !input.trim().is_empty()
    }

    /// Append the user's message and mark a call as pending.
    ///
    /// Returns `None` without touching the log when the input is blank or a
    /// call is already in flight.
    pub fn submit(&mut self, input: &str) -> Option<Submission> {
        if !self.can_submit(input) {
            return None;
        }

        let text = input.trim().to_string();
        let prompt = build_prompt(&self.instructions, &text);
        self.messages.push(Message::new(text, true));
        self.pending = true;

        tracing::info!(prompt_len = prompt.len(), "submitting message");
        Some(Submission { prompt })
    }

    /// Record the outcome of the pending call: exactly one message is
    /// appended and the pending flag is cleared.
    pub fn resolve(&mut self, result: Result<String, WebhookError>) -> Resolution {
        if !self.pending {
            tracing::warn!("ignoring webhook result with no call pending");
            return Resolution::Ignored;
        }
        self.pending = false;

        match result {
            Ok(raw) => {
                self.messages.push(Message::new(format_response(&raw), false));
                Resolution::Replied
            }
            Err(e) => {
                tracing::error!(error = %e, "error calling webhook");
                self.messages.push(Message::new(ERROR_REPLY.to_string(), false));
                Resolution::Failed
            }
        }
    }

    /// Submit, call the webhook, and resolve in one go. Returns `None` when
    /// the submission was refused.
    pub async fn send(&mut self, client: &WebhookClient, input: &str) -> Option<Resolution> {
        let submission = self.submit(input)?;
        let result = client.fetch_reply(&submission.prompt).await;
        Some(self.resolve(result))
    }
}
