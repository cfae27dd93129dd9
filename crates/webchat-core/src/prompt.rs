/// Instruction preamble sent ahead of every user question so the backend
/// answers in clean, readable markdown.
pub const FORMATTING_INSTRUCTIONS: &str = "Always format your responses in a clear, easy-to-read way using markdown.

Formatting rules:
- Use **bold** or headings for key sections.
- Use bullet points (with - or *) or numbered lists when listing items.
- Add blank lines between paragraphs and list sections for readability.
- For lists under a heading, add a blank line after the heading before starting the list.
- Add a blank line between each major list item or section.
- Keep explanations concise and visually organized.
- End with a **Sources** section (if applicable), formatted as:
  
  **Sources**
  - source1.pdf
  - source2.pdf

User question: ";

/// Prepend the formatting instructions to the user's text.
pub fn build_prompt(instructions: &str, user_text: &str) -> String {
    let mut prompt = String::with_capacity(instructions.len() + user_text.len());
    prompt.push_str(instructions);
    prompt.push_str(user_text);
    prompt
}
