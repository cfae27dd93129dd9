pub mod config;
pub mod conversation;
pub mod format;
pub mod prompt;
pub mod webhook;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use config::Config;
pub use conversation::{Conversation, Message, Resolution, Submission, ERROR_REPLY, FAILURE_NOTICE};
pub use format::format_response;
pub use prompt::{build_prompt, FORMATTING_INSTRUCTIONS};
pub use webhook::{WebhookClient, WebhookError, DEFAULT_WEBHOOK_URL};
