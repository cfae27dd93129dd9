//! Markdown rendering for bot replies using pulldown-cmark.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Render a bot reply as styled lines.
pub fn render_markdown(input: &str) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut renderer = MarkdownRenderer::new();
    renderer.run(Parser::new_ext(input, options));

    // Paragraph spacing after the last block is handled by the chat view
    while renderer.lines.last().is_some_and(|line| line.spans.is_empty()) {
        renderer.lines.pop();
    }
    renderer.lines
}

struct MarkdownRenderer {
    lines: Vec<Line<'static>>,
    /// Active inline styles, patched together for each text run.
    style_stack: Vec<Style>,
    current_spans: Vec<Span<'static>>,
    /// One entry per open list: the next number for ordered lists.
    list_stack: Vec<Option<u64>>,
    pending_list_marker: Option<String>,
    in_code_block: bool,
    in_blockquote: bool,
}

impl MarkdownRenderer {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            style_stack: Vec::new(),
            current_spans: Vec::new(),
            list_stack: Vec::new(),
            pending_list_marker: None,
            in_code_block: false,
            in_blockquote: false,
        }
    }

    fn run<'a>(&mut self, parser: impl Iterator<Item = Event<'a>>) {
        for event in parser {
            self.handle_event(event);
        }
        self.flush_line();
    }

    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush_line();
                self.style_stack.push(heading_style(level));
            }
            Event::End(TagEnd::Heading(_)) => {
                self.flush_line();
                self.style_stack.pop();
                self.lines.push(Line::default());
            }

            Event::Start(Tag::Emphasis) => {
                self.style_stack.push(Style::default().add_modifier(Modifier::ITALIC));
            }
            Event::Start(Tag::Strong) => {
                self.style_stack.push(Style::default().add_modifier(Modifier::BOLD));
            }
            Event::Start(Tag::Strikethrough) => {
                self.style_stack.push(Style::default().add_modifier(Modifier::CROSSED_OUT));
            }
            Event::Start(Tag::Link { .. }) => {
                self.style_stack.push(
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            Event::End(TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link) => {
                self.style_stack.pop();
            }

            Event::Start(Tag::CodeBlock(_)) => {
                self.flush_line();
                self.in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                self.flush_line();
                self.in_code_block = false;
            }

            Event::Start(Tag::List(start)) => {
                self.flush_line();
                self.list_stack.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.lines.push(Line::default());
                }
            }
            Event::Start(Tag::Item) => {
                self.flush_line();
                let indent = "  ".repeat(self.list_stack.len().saturating_sub(1));
                let marker = match self.list_stack.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                self.pending_list_marker = Some(marker);
            }
            Event::End(TagEnd::Item) => {
                // Items with no text of their own still show their marker
                if let Some(marker) = self.pending_list_marker.take() {
                    self.current_spans.push(Span::styled(marker, list_marker_style()));
                }
                self.flush_line();
            }

            Event::Start(Tag::BlockQuote) => {
                self.flush_line();
                self.in_blockquote = true;
            }
            Event::End(TagEnd::BlockQuote) => {
                self.flush_line();
                self.in_blockquote = false;
            }

            Event::End(TagEnd::Paragraph) => {
                self.flush_line();
                if self.list_stack.is_empty() {
                    self.lines.push(Line::default());
                }
            }

            Event::Text(text) => self.add_text(&text),
            Event::Code(code) => {
                self.start_inline();
                self.current_spans.push(Span::styled(
                    code.to_string(),
                    Style::default().fg(Color::Magenta),
                ));
            }
            Event::SoftBreak => self.add_text(" "),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.flush_line();
                self.lines.push(Line::from(Span::styled(
                    "────────",
                    Style::default().fg(Color::DarkGray),
                )));
            }

            _ => {}
        }
    }

    /// Emit any pending list marker or quote prefix before inline content.
    fn start_inline(&mut self) {
        if let Some(marker) = self.pending_list_marker.take() {
            self.current_spans.push(Span::styled(marker, list_marker_style()));
        }
        if self.in_blockquote && self.current_spans.is_empty() {
            self.current_spans.push(Span::styled(
                "> ".to_string(),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    fn add_text(&mut self, text: &str) {
        if self.in_code_block {
            let indent = "  ".repeat(self.list_stack.len());
            for line in text.lines() {
                self.current_spans.push(Span::styled(
                    format!("{indent}  {line}"),
                    Style::default().fg(Color::Green),
                ));
                self.flush_line();
            }
            return;
        }

        self.start_inline();
        let style = self.current_style();
        self.current_spans.push(Span::styled(text.to_string(), style));
    }

    fn current_style(&self) -> Style {
        self.style_stack
            .iter()
            .fold(Style::default(), |style, s| style.patch(*s))
    }

    fn flush_line(&mut self) {
        if !self.current_spans.is_empty() {
            let spans = std::mem::take(&mut self.current_spans);
            self.lines.push(Line::from(spans));
        }
    }
}

fn heading_style(level: HeadingLevel) -> Style {
    let style = Style::default().add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 | HeadingLevel::H2 => style.fg(Color::Cyan),
        _ => style,
    }
}

fn list_marker_style() -> Style {
    Style::default().fg(Color::Yellow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn span_with<'a>(lines: &'a [Line<'static>], text: &str) -> &'a Span<'static> {
        lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .find(|span| span.content == text)
            .unwrap()
    }

    #[test]
    fn test_heading_is_bold_without_hashes() {
        let lines = render_markdown("## Key Points");
        assert_eq!(plain(&lines[0]), "Key Points");
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_bullet_marker_replaced() {
        let lines = render_markdown("- Revenue: grew 10%");
        assert_eq!(plain(&lines[0]), "• Revenue: grew 10%");
    }

    #[test]
    fn test_ordered_list_numbered() {
        let lines = render_markdown("1. First step\n2. Second step");
        assert_eq!(plain(&lines[0]), "1. First step");
        assert_eq!(plain(&lines[1]), "2. Second step");
        assert_eq!(lines[0].spans[0].style.fg, Some(Color::Yellow));
    }

    #[test]
    fn test_ordered_list_keeps_start_number() {
        let lines = render_markdown("3. Third\n4. Fourth");
        assert_eq!(plain(&lines[0]), "3. Third");
        assert_eq!(plain(&lines[1]), "4. Fourth");
    }

    #[test]
    fn test_nested_list_indented() {
        let lines = render_markdown("- Outer\n  - Inner");
        assert_eq!(plain(&lines[0]), "• Outer");
        assert_eq!(plain(&lines[1]), "  • Inner");
    }

    #[test]
    fn test_bold_span() {
        let lines = render_markdown("see **Sources** below");
        let spans = &lines[0].spans;
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].content, "Sources");
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_italic_nested_in_bold() {
        let lines = render_markdown("**Bold with *italic* inside**");
        assert_eq!(plain(&lines[0]), "Bold with italic inside");

        let italic = span_with(&lines, "italic");
        assert!(italic.style.add_modifier.contains(Modifier::BOLD | Modifier::ITALIC));
        let outer = span_with(&lines, "Bold with ");
        assert!(!outer.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn test_bold_italic_triple_asterisk() {
        let lines = render_markdown("***both***");
        assert_eq!(plain(&lines[0]), "both");
        let both = span_with(&lines, "both");
        assert!(both.style.add_modifier.contains(Modifier::BOLD | Modifier::ITALIC));
    }

    #[test]
    fn test_link_text_styled() {
        let lines = render_markdown("[Docs](https://example.com)");
        assert_eq!(plain(&lines[0]), "Docs");
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_inline_code() {
        let lines = render_markdown("run `cargo run` now");
        let code = span_with(&lines, "cargo run");
        assert_eq!(code.style.fg, Some(Color::Magenta));
    }

    #[test]
    fn test_lone_asterisk_is_literal() {
        let lines = render_markdown("2 * 3 = 6");
        assert_eq!(plain(&lines[0]), "2 * 3 = 6");
    }

    #[test]
    fn test_code_block_not_parsed_inline() {
        let lines = render_markdown("```\nlet x = **1**;\n```\ndone");
        assert_eq!(lines.len(), 2);
        assert_eq!(plain(&lines[0]), "  let x = **1**;");
        assert_eq!(plain(&lines[1]), "done");
    }

    #[test]
    fn test_blank_line_between_paragraphs() {
        let lines = render_markdown("a\n\nb");
        assert_eq!(lines.len(), 3);
        assert!(plain(&lines[1]).is_empty());
        assert_eq!(plain(&lines[2]), "b");
    }

    #[test]
    fn test_empty_input() {
        assert!(render_markdown("").is_empty());
    }
}
