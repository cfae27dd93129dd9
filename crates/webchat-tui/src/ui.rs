use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
    },
};
use crate::app::App;
use crate::markdown::render_markdown;

const MIN_INPUT_HEIGHT: u16 = 3;
const MAX_INPUT_HEIGHT: u16 = 8;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let input_rows = app.input.split('\n').count() as u16;
    let input_height = (input_rows + 2).clamp(MIN_INPUT_HEIGHT, MAX_INPUT_HEIGHT);

    // Main layout: header, chat, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(input_height),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);

    if app.notification.is_some() {
        render_notification(app, frame, chat_area);
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" AI Assistant ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            "· Your intelligent workspace companion ",
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Black),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);

    if app.conversation.is_empty() && !app.is_waiting() {
        app.update_chat_layout(0, inner.height);
        frame.render_widget(welcome(inner.height).block(block), area);
        return;
    }

    let lines = chat_lines(app);

    // Estimate wrapped height so the view can follow the newest message
    let width = inner.width.max(1) as usize;
    let total_lines: usize = lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum();
    let total_lines = total_lines.min(u16::MAX as usize) as u16;
    app.update_chat_layout(total_lines, inner.height);

    let chat = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, area);

    if total_lines > inner.height {
        let mut scrollbar_state = ScrollbarState::new(total_lines.saturating_sub(inner.height) as usize)
            .position(app.chat_scroll as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area,
            &mut scrollbar_state,
        );
    }
}

fn welcome(height: u16) -> Paragraph<'static> {
    let mut lines: Vec<Line> = Vec::new();
    for _ in 0..height.saturating_sub(4) / 2 {
        lines.push(Line::default());
    }
    lines.push(Line::from(Span::styled(
        "Welcome to AI Assistant",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Ask me anything about product management, strategy, or get help with your work.",
        Style::default().fg(Color::DarkGray),
    )));

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

/// User messages sit on the right, bot replies on the left with markdown.
fn chat_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for msg in app.conversation.messages() {
        if msg.is_user() {
            lines.push(
                Line::from(Span::styled(
                    "You",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Right),
            );
            for line in msg.text().split('\n') {
                lines.push(
                    Line::from(Span::styled(line.to_string(), Style::default().fg(Color::White)))
                        .alignment(Alignment::Right),
                );
            }
        } else {
            lines.push(Line::from(Span::styled(
                "Assistant",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            lines.extend(render_markdown(msg.text()));
        }
        lines.push(Line::default());
    }

    if app.is_waiting() {
        lines.push(Line::from(Span::styled(
            "Assistant",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let waiting = app.is_waiting();
    let (title, border_color) = if waiting {
        (" Waiting for reply... ", Color::DarkGray)
    } else {
        (" Message ", Color::Cyan)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);
    let inner = block.inner(area);

    // Cursor row/column within the draft
    let before_cursor: String = app.input.chars().take(app.input_cursor).collect();
    let cursor_row = before_cursor.matches('\n').count() as u16;
    let cursor_col = before_cursor
        .rsplit('\n')
        .next()
        .map(|line| line.chars().count())
        .unwrap_or(0) as u16;
    let input_scroll = cursor_row.saturating_sub(inner.height.saturating_sub(1));

    let input = if app.input.is_empty() {
        Paragraph::new(Span::styled(
            "Type your message...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let style = if waiting {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        Paragraph::new(app.input.as_str()).style(style)
    };

    frame.render_widget(input.block(block).scroll((input_scroll, 0)), area);

    if inner.width > 0 && inner.height > 0 {
        let x = inner.x + cursor_col.min(inner.width - 1);
        let y = inner.y + cursor_row - input_scroll;
        frame.set_cursor_position((x, y));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let send_hint = if app.is_waiting() {
        Span::styled(" waiting ", Style::default().fg(Color::Black).bg(Color::DarkGray))
    } else {
        Span::styled(" Enter send ", Style::default().fg(Color::Black).bg(Color::Cyan))
    };

    let hints = Line::from(vec![
        send_hint,
        Span::styled(
            " Shift/Alt+Enter newline · ↑↓ PgUp/PgDn scroll · Ctrl+End latest · Esc quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(hints), area);
}

fn render_notification(app: &App, frame: &mut Frame, area: Rect) {
    let Some(notification) = &app.notification else {
        return;
    };

    let width = (notification.text.chars().count() as u16 + 4).min(area.width);
    let height = 3.min(area.height);
    let toast_area = Rect::new(
        area.x + area.width.saturating_sub(width + 1),
        area.y + 1,
        width,
        height,
    );

    let toast = Paragraph::new(notification.text.as_str())
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );

    frame.render_widget(Clear, toast_area);
    frame.render_widget(toast, toast_area);
}
