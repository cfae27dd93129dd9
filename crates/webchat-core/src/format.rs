//! Best-effort cleanup of raw bot replies before they are displayed.
//!
//! Webhook backends tend to return markdown that is almost right: escaped
//! newlines, headings glued to the list below them, and "Label: detail"
//! lines that read better as bullets. None of this is guaranteed to be
//! correct on arbitrary prose, so plain sentences such as `Note: see below`
//! will also be bulletized.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// A capitalized title of modest length, a colon, then some detail.
static TITLE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][^:.!?]{0,60}:\s+\S").unwrap());

/// Bulleted or numbered markdown list items.
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*+]\s|\d+[.)]\s)").unwrap());

/// Format a raw bot reply for display.
pub fn format_response(raw: &str) -> String {
    let text = unescape_newlines(raw);
    let spaced = space_after_headings(&text);
    spaced
        .split('\n')
        .map(bulletize_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turn the two-character sequence `\n` into a real line break.
fn unescape_newlines(raw: &str) -> Cow<'_, str> {
    if raw.contains("\\n") {
        Cow::Owned(raw.replace("\\n", "\n"))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Insert a blank line after every line ending in a colon when the next
/// line has content.
fn space_after_headings(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        out.push(line);

        let trimmed = line.trim();
        if trimmed.is_empty() || !trimmed.ends_with(':') {
            continue;
        }
        if let Some(next) = lines.get(i + 1) {
            if !next.trim().is_empty() {
                out.push("");
            }
        }
    }

    out.join("\n")
}

fn bulletize_line(line: &str) -> Cow<'_, str> {
    let body = line.trim_start();
    if body.is_empty()
        || LIST_ITEM.is_match(body)
        || !TITLE_LINE.is_match(body)
        || body.trim_end().to_lowercase().ends_with("include:")
    {
        return Cow::Borrowed(line);
    }

    let indent = &line[..line.len() - body.len()];
    Cow::Owned(format!("{indent}- {body}"))
}
