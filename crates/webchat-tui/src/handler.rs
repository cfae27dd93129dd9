use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use crate::app::App;
use crate::tui::AppEvent;

const MOUSE_SCROLL_LINES: u16 = 3;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Esc => app.should_quit = true,

        // Ctrl+S stands in for the send button
        KeyCode::Char('s') if ctrl => app.send_input(),
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            insert_char(app, '\n');
        }
        KeyCode::Enter => app.send_input(),

        // Chat scrolling
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_half_page_up(),
        KeyCode::PageDown => app.scroll_half_page_down(),
        KeyCode::Home if ctrl => app.scroll_to_top(),
        KeyCode::End if ctrl => app.scroll_to_bottom(),

        // Draft editing
        KeyCode::Backspace => {
            if app.input_cursor > 0 {
                app.input_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.input, app.input_cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.input.chars().count();
            if app.input_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.input, app.input_cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.input_cursor = app.input_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.input.chars().count();
            app.input_cursor = (app.input_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.input_cursor = 0;
        }
        KeyCode::End => {
            app.input_cursor = app.input.chars().count();
        }
        KeyCode::Char(c) if !ctrl => insert_char(app, c),
        _ => {}
    }
}

fn insert_char(app: &mut App, c: char) {
    let byte_pos = char_to_byte_index(&app.input, app.input_cursor);
    app.input.insert(byte_pos, c);
    app.input_cursor += 1;
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.scroll_up(MOUSE_SCROLL_LINES),
        MouseEventKind::ScrollDown => app.scroll_down(MOUSE_SCROLL_LINES),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webchat_core::Config;

    fn test_app() -> App {
        let config = Config {
            webhook_url: Some("http://127.0.0.1:9/webhook".to_string()),
            formatting_instructions: None,
        };
        App::new(&config)
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        handle_event(app, AppEvent::Key(KeyEvent::new(code, modifiers)));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[test]
    fn test_char_to_byte_index_multibyte() {
        assert_eq!(char_to_byte_index("héllo", 2), 3);
        assert_eq!(char_to_byte_index("hé", 5), 3);
    }

    #[test]
    fn test_editing_at_cursor() {
        let mut app = test_app();
        type_str(&mut app, "héllo");
        press(&mut app, KeyCode::Left, KeyModifiers::NONE);
        press(&mut app, KeyCode::Left, KeyModifiers::NONE);
        press(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(app.input, "hélo");

        press(&mut app, KeyCode::Home, KeyModifiers::NONE);
        press(&mut app, KeyCode::Delete, KeyModifiers::NONE);
        assert_eq!(app.input, "élo");
        assert_eq!(app.input_cursor, 0);

        press(&mut app, KeyCode::End, KeyModifiers::NONE);
        assert_eq!(app.input_cursor, 3);
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        let mut app = test_app();
        type_str(&mut app, "a");
        press(&mut app, KeyCode::Enter, KeyModifiers::SHIFT);
        type_str(&mut app, "b");
        press(&mut app, KeyCode::Enter, KeyModifiers::ALT);
        assert_eq!(app.input, "a\nb\n");
        assert!(app.conversation.is_empty());
    }

    #[tokio::test]
    async fn test_enter_sends() {
        let mut app = test_app();
        type_str(&mut app, "Hello");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);

        assert!(app.input.is_empty());
        assert!(app.is_waiting());
        assert_eq!(app.conversation.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_ctrl_s_sends() {
        let mut app = test_app();
        type_str(&mut app, "Hello");
        press(&mut app, KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(app.conversation.messages().len(), 1);
    }

    #[test]
    fn test_enter_on_blank_draft_is_noop() {
        let mut app = test_app();
        type_str(&mut app, "   ");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.conversation.is_empty());
        assert!(!app.is_waiting());
        assert_eq!(app.input, "   ");
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);

        let mut app = test_app();
        press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(app.should_quit);
    }

    #[test]
    fn test_mouse_wheel_scrolls_chat() {
        let mut app = test_app();
        app.update_chat_layout(50, 10);
        handle_event(
            &mut app,
            AppEvent::Mouse(MouseEvent {
                kind: MouseEventKind::ScrollUp,
                column: 0,
                row: 0,
                modifiers: KeyModifiers::NONE,
            }),
        );
        assert_eq!(app.chat_scroll, 37);
        assert!(!app.follow_bottom);
    }
}
