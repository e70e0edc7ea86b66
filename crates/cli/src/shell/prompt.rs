use nu_ansi_term::Color;
use reedline::{Prompt, PromptEditMode, PromptHistorySearch};
use std::borrow::Cow;

pub struct DefaultPrompt {
    project: String,
}

impl DefaultPrompt {
    pub fn new(project: String) -> Self {
        Self { project }
    }
}

impl Prompt for DefaultPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        let prefix = Color::LightBlue.bold().paint("goscope");
        let project = Color::Yellow.paint(shorten(&self.project));
        Cow::Owned(format!("{} {} > ", prefix, project))
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _edit_mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed(".. ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        Cow::Borrowed("(search) ")
    }
}

const MAX_PROMPT_NAME: usize = 24;

fn shorten(name: &str) -> String {
    if name.chars().count() <= MAX_PROMPT_NAME {
        return name.to_string();
    }
    let tail: String = name
        .chars()
        .rev()
        .take(MAX_PROMPT_NAME - 1)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("…{}", tail)
}
