use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use webchat_core::{Config, Conversation, Resolution, WebhookClient, WebhookError, FAILURE_NOTICE};

/// How long a toast notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// A transient toast shown over the chat.
#[derive(Debug, Clone)]
pub struct Notification {
    pub text: String,
    pub expires_at: Instant,
}

pub struct App {
    pub should_quit: bool,

    // Chat state
    pub conversation: Conversation,
    pub client: WebhookClient,
    pub pending_task: Option<JoinHandle<Result<String, WebhookError>>>,

    // Draft input
    pub input: String,
    pub input_cursor: usize, // cursor position in chars

    // Chat scrolling (dimensions updated during render)
    pub chat_scroll: u16,
    pub follow_bottom: bool,
    pub chat_height: u16,
    pub total_chat_lines: u16,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    pub notification: Option<Notification>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let webhook_url = config.webhook_url();
        tracing::info!(url = %webhook_url, "using webhook");

        Self {
            should_quit: false,

            conversation: Conversation::with_instructions(config.formatting_instructions()),
            client: WebhookClient::new(&webhook_url),
            pending_task: None,

            input: String::new(),
            input_cursor: 0,

            chat_scroll: 0,
            follow_bottom: true,
            chat_height: 0,
            total_chat_lines: 0,

            animation_frame: 0,

            notification: None,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.conversation.is_pending()
    }

    /// Submit the draft. Refused while a reply is pending or when the draft
    /// is blank; the draft is kept in that case.
    pub fn send_input(&mut self) {
        let Some(submission) = self.conversation.submit(&self.input) else {
            return;
        };

        self.input.clear();
        self.input_cursor = 0;
        self.follow_bottom = true;

        let client = self.client.clone();
        self.pending_task = Some(tokio::spawn(async move {
            client.fetch_reply(&submission.prompt).await
        }));
    }

    /// Resolve the in-flight webhook call once its task has finished.
    pub async fn poll_pending(&mut self) {
        let finished = self
            .pending_task
            .as_ref()
            .is_some_and(|task| task.is_finished());
        if !finished {
            return;
        }

        if let Some(task) = self.pending_task.take() {
            let result = task.await.unwrap_or_else(|e| Err(WebhookError::from(e)));
            if self.conversation.resolve(result) == Resolution::Failed {
                self.notify(FAILURE_NOTICE);
            }
            self.follow_bottom = true;
        }
    }

    pub fn notify(&mut self, text: &str) {
        self.notification = Some(Notification {
            text: text.to_string(),
            expires_at: Instant::now() + NOTIFICATION_TTL,
        });
    }

    /// Advance the thinking animation and drop expired notifications
    pub fn tick(&mut self) {
        if self.is_waiting() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        if self
            .notification
            .as_ref()
            .is_some_and(|n| Instant::now() >= n.expires_at)
        {
            self.notification = None;
        }
    }

    // Chat scrolling
    fn max_scroll(&self) -> u16 {
        self.total_chat_lines.saturating_sub(self.chat_height)
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.follow_bottom = false;
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max_scroll = self.max_scroll();
        self.chat_scroll = (self.chat_scroll + lines).min(max_scroll);
        self.follow_bottom = self.chat_scroll >= max_scroll;
    }

    pub fn scroll_half_page_up(&mut self) {
        self.scroll_up((self.chat_height / 2).max(1));
    }

    pub fn scroll_half_page_down(&mut self) {
        self.scroll_down((self.chat_height / 2).max(1));
    }

    pub fn scroll_to_top(&mut self) {
        self.follow_bottom = false;
        self.chat_scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.follow_bottom = true;
        self.chat_scroll = self.max_scroll();
    }

    /// Record the rendered chat size and keep the scroll offset in range.
    pub fn update_chat_layout(&mut self, total_lines: u16, height: u16) {
        self.total_chat_lines = total_lines;
        self.chat_height = height;
        let max_scroll = self.max_scroll();
        if self.follow_bottom {
            self.chat_scroll = max_scroll;
        } else {
            self.chat_scroll = self.chat_scroll.min(max_scroll);
        }
    }
}
