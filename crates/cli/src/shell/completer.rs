use super::context::ShellContext;
use reedline::{Completer, Span, Suggestion};

const MAX_SUGGESTIONS: usize = 50;

/// Completes command names at the start of the line and indexed words
/// everywhere else.
pub struct GoscopeCompleter {
    commands: Vec<String>,
    context: ShellContext,
}

impl GoscopeCompleter {
    pub fn new(commands: Vec<String>, context: ShellContext) -> Self {
        Self { commands, context }
    }
}

fn suggestion(value: String, start: usize, end: usize) -> Suggestion {
    Suggestion {
        value,
        description: None,
        style: None,
        extra: None,
        span: Span { start, end },
        append_whitespace: true,
        match_indices: None,
    }
}

impl Completer for GoscopeCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let line = &line[..pos.min(line.len())];
        let trimmed = line.trim_start();

        if !trimmed.contains(char::is_whitespace) {
            return self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(trimmed))
                .map(|cmd| suggestion(cmd.clone(), pos - trimmed.len(), pos))
                .collect();
        }

        let last_word = if line.ends_with(char::is_whitespace) {
            ""
        } else {
            line.split_whitespace().last().unwrap_or("")
        };
        // Flags and empty words would list the whole index.
        if last_word.is_empty() || last_word.starts_with('-') {
            return Vec::new();
        }

        let start = pos - last_word.len();
        self.context
            .engine()
            .complete(last_word, MAX_SUGGESTIONS)
            .into_iter()
            .map(|word| suggestion(word, start, pos))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goscope_core::index::{FileIndex, IndexBuilder};
    use goscope_core::model::{Location, Variable};
    use goscope_core::Workspace;

    fn completer() -> GoscopeCompleter {
        let mut file = FileIndex::new("main.go");
        for (line, name) in ["server", "serve", "count"].iter().enumerate() {
            file.push(Variable::new(Location::new("main.go", line + 1), *name, true));
        }
        let mut builder = IndexBuilder::new();
        builder.add_file(file);
        let workspace = Workspace::from_index("/tmp/project", builder.finish());
        GoscopeCompleter::new(
            vec!["search".to_string(), "summary".to_string(), "list".to_string()],
            ShellContext::new(workspace),
        )
    }

    #[test]
    fn completes_commands_first() {
        let mut c = completer();
        let values: Vec<String> = c.complete("s", 1).into_iter().map(|s| s.value).collect();
        assert_eq!(values, ["search", "summary"]);
    }

    #[test]
    fn completes_indexed_words() {
        let mut c = completer();
        let line = "search ser";
        let suggestions = c.complete(line, line.len());
        let values: Vec<&str> = suggestions.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, ["serve", "server"]);
        assert_eq!(suggestions[0].span, Span { start: 7, end: 10 });

        assert!(c.complete("search -", 8).is_empty());
    }
}
