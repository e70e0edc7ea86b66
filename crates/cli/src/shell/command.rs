use super::context::ShellContext;
use super::view::{LocationView, WordMatchView};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use goscope_core::Workspace;
use goscope_core::query::{FileFilter, ListOrder, QueryOptions};
use tabled::{Table, settings::Style};
use tracing::warn;

const NO_RECORDS: &str = "NO RECORDS FOUND";

/// Commands understood by the interactive shell
#[derive(Parser, Clone, Debug, PartialEq, Eq)]
#[command(no_binary_name = true)]
pub enum ShellCommand {
    /// Words starting with a prefix, one row per word
    #[command(long_about = "Expands WORD through the prefix index and prints one row per \
                            matching word with its occurrence count and a file it appears in.\n\
                            Sort orders: lex (alphabetical) or count (fewest occurrences \
                            first); rel orders word rows like lex.\n\
                            Kinds: all, function, variable, struct.")]
    Search {
        /// Word prefix
        word: String,
        /// Number of results
        #[arg(short, long)]
        limit: Option<String>,
        /// Ranking: lex, count or rel
        #[arg(short, long, default_value = "lex")]
        sort: String,
        /// Comma separated files to search within
        #[arg(short, long, default_value = "all")]
        file: String,
        /// Reference kind
        #[arg(short, long, default_value = "all")]
        kind: String,
    },
    /// Every occurrence of an exact word
    #[command(long_about = "Prints each location of WORD with its kind, whether it is a \
                            declaration and the function it sits in.\n\
                            Sort orders: pos (file, then line) or rel.")]
    List {
        /// Exact word
        word: String,
        /// Number of results
        #[arg(short, long)]
        limit: Option<String>,
        /// Ordering: pos or rel
        #[arg(short, long, default_value = "pos")]
        sort: String,
        /// Comma separated files to list from
        #[arg(short, long, default_value = "all")]
        file: String,
    },
    /// Call tree starting at func main
    Calls,
    /// Index statistics as JSON
    Summary,
    /// Detailed help for a command
    Man {
        /// Command name
        command: Option<String>,
    },
}

impl ShellCommand {
    pub fn command_names() -> Vec<String> {
        let cmd = Self::command();
        let mut names = vec!["help".to_string(), "exit".to_string(), "quit".to_string()];
        names.extend(cmd.get_subcommands().map(|s| s.get_name().to_string()));
        names
    }

    pub fn execute(&self, context: &ShellContext) -> Result<String, Box<dyn std::error::Error>> {
        let workspace = context.workspace();
        match self {
            ShellCommand::Search {
                word,
                limit,
                sort,
                file,
                kind,
            } => {
                let options = QueryOptions::lenient(
                    Some(sort.as_str()),
                    limit.as_deref(),
                    Some(kind.as_str()),
                    Some(file.as_str()),
                );
                Ok(render_search(workspace, word, &options))
            }
            ShellCommand::List {
                word,
                limit,
                sort,
                file,
            } => {
                let order = sort.parse::<ListOrder>().unwrap_or_else(|e| {
                    warn!("{}, listing by position", e);
                    ListOrder::default()
                });
                let files = file.parse::<FileFilter>().unwrap_or_default();
                let limit = QueryOptions::lenient(None, limit.as_deref(), None, None).limit;
                Ok(render_list(workspace, word, order, &files, limit))
            }
            ShellCommand::Calls => Ok(workspace
                .call_graph()
                .map(|graph| graph.render_tree())
                .unwrap_or_else(|| "no entry function".to_string())),
            ShellCommand::Summary => Ok(serde_json::to_string_pretty(&workspace.summary())?),
            ShellCommand::Man { command } => render_manual(command.as_deref()),
        }
    }
}

pub fn parse_shell_command(
    input: &str,
) -> Result<Option<ShellCommand>, Box<dyn std::error::Error>> {
    let args = shlex::split(input).ok_or("Invalid quoting")?;

    match ShellCommand::try_parse_from(args) {
        Ok(c) => Ok(Some(c)),
        Err(e) => {
            if e.kind() == ErrorKind::DisplayHelp || e.kind() == ErrorKind::DisplayVersion {
                println!("{}", e);
                return Ok(None);
            }
            Err(Box::new(e))
        }
    }
}

pub fn render_search(workspace: &Workspace, word: &str, options: &QueryOptions) -> String {
    let units = workspace.query_engine().search(word, options);
    if units.is_empty() {
        return NO_RECORDS.to_string();
    }
    let views: Vec<WordMatchView> = units
        .iter()
        .enumerate()
        .map(|(i, unit)| WordMatchView::from_match(i + 1, unit))
        .collect();
    Table::new(&views).with(Style::psql()).to_string()
}

fn render_list(
    workspace: &Workspace,
    word: &str,
    order: ListOrder,
    files: &FileFilter,
    limit: usize,
) -> String {
    let Some(refs) = workspace.query_engine().list(word, order, files, limit) else {
        return format!("'{}' not found", word);
    };
    if refs.is_empty() {
        return NO_RECORDS.to_string();
    }
    let views: Vec<LocationView> = refs
        .iter()
        .enumerate()
        .map(|(i, r)| LocationView::from_reference(i + 1, r))
        .collect();
    Table::new(&views).with(Style::psql()).to_string()
}

fn render_manual(command: Option<&str>) -> Result<String, Box<dyn std::error::Error>> {
    let mut root = ShellCommand::command();
    let Some(name) = command else {
        return Ok(root.render_long_help().to_string());
    };
    match root.find_subcommand_mut(name) {
        Some(sub) => Ok(sub.render_long_help().to_string()),
        None => Err(format!("no manual entry for '{}'", name).into()),
    }
}
