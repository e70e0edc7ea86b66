use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

pub struct GoscopeHighlighter {
    commands: Vec<String>,
}

impl GoscopeHighlighter {
    pub fn new(commands: Vec<String>) -> Self {
        Self { commands }
    }
}

impl Highlighter for GoscopeHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled_text = StyledText::new();
        let mut seen_command = false;

        for word in line.split_inclusive(char::is_whitespace) {
            let trimmed = word.trim();
            if trimmed.is_empty() {
                styled_text.push((Style::new(), word.to_string()));
                continue;
            }

            let style = if !seen_command {
                seen_command = true;
                if self.commands.iter().any(|c| c == trimmed) {
                    Style::new().fg(Color::LightGreen).bold()
                } else {
                    Style::new().fg(Color::Red)
                }
            } else if trimmed.starts_with('-') {
                Style::new().fg(Color::Cyan)
            } else if trimmed.ends_with(".go") || trimmed.contains('/') {
                Style::new().fg(Color::Yellow)
            } else {
                Style::new()
            };
            styled_text.push((style, word.to_string()));
        }

        styled_text
    }
}
