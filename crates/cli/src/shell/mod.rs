mod command;
mod completer;
mod context;
mod highlighter;
mod prompt;
mod view;

use reedline::{
    ColumnarMenu, DefaultHinter, Emacs, FileBackedHistory, History, KeyCode, KeyModifiers,
    MenuBuilder, Reedline, ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, warn};

pub use self::command::render_search;
use self::command::{ShellCommand, parse_shell_command};
use self::completer::GoscopeCompleter;
use self::context::ShellContext;
use self::highlighter::GoscopeHighlighter;
use self::prompt::DefaultPrompt;

const SHELL_HISTORY_SIZE: usize = 500;

pub struct ReplServer {
    context: ShellContext,
}

impl ReplServer {
    pub fn new(project_path: PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        println!("Project: {}", project_path.display());
        let start = Instant::now();
        let workspace = goscope_runtime::build_workspace(project_path)?;
        println!(
            "Indexed {} files, {} words in {:?}",
            workspace.index().files().len(),
            workspace.index().word_count(),
            start.elapsed()
        );
        Ok(Self {
            context: ShellContext::new(workspace),
        })
    }

    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        println!("Type 'help' for commands.");
        let line_editor = self.setup_line_editor();
        self.run_loop(line_editor)
    }

    fn history() -> Box<dyn History> {
        let file = dirs::home_dir().and_then(|mut p| {
            p.push(".goscope");
            p.push("shell");
            std::fs::create_dir_all(&p).ok()?;
            p.push("history");
            Some(p)
        });

        if let Some(file) = file {
            match FileBackedHistory::with_file(SHELL_HISTORY_SIZE, file) {
                Ok(history) => return Box::new(history),
                Err(e) => warn!("history file unavailable, keeping it in memory: {}", e),
            }
        }
        match FileBackedHistory::new(SHELL_HISTORY_SIZE) {
            Ok(history) => Box::new(history),
            Err(_) => Box::new(FileBackedHistory::default()),
        }
    }

    fn setup_line_editor(&self) -> Reedline {
        let commands = ShellCommand::command_names();

        let completer = Box::new(GoscopeCompleter::new(commands.clone(), self.context.clone()));
        let completion_menu = Box::new(ColumnarMenu::default().with_name("completion_menu"));

        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu("completion_menu".to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );

        let highlighter = Box::new(GoscopeHighlighter::new(commands));

        Reedline::create()
            .with_history(Self::history())
            .with_completer(completer)
            .with_highlighter(highlighter)
            .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
            .with_hinter(Box::new(
                DefaultHinter::default().with_style(
                    nu_ansi_term::Style::new()
                        .italic()
                        .fg(nu_ansi_term::Color::LightGray),
                ),
            ))
            .with_edit_mode(Box::new(Emacs::new(keybindings)))
    }

    fn run_loop(&self, mut line_editor: Reedline) -> Result<(), Box<dyn std::error::Error>> {
        let prompt = DefaultPrompt::new(self.context.project_name());

        loop {
            match line_editor.read_line(&prompt) {
                Ok(Signal::Success(buffer)) => {
                    let trimmed = buffer.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if trimmed == "exit" || trimmed == "quit" {
                        break;
                    }

                    match parse_shell_command(trimmed) {
                        Ok(Some(cmd)) => match cmd.execute(&self.context) {
                            Ok(output) => {
                                if !output.is_empty() {
                                    println!("{}", output);
                                }
                            }
                            Err(e) => eprintln!("Error: {}", e),
                        },
                        Ok(None) => {}
                        Err(e) => eprintln!("{}", e),
                    }
                }
                Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                    println!("Bye!");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    error!("line editor failed: {}", e);
                    return Err(Box::new(e));
                }
            }
        }
        Ok(())
    }
}

pub fn run(project_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    ReplServer::new(project_path)?.run()
}
