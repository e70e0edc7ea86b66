mod config;
mod graph;
mod serve;
mod shell;

use clap::{Parser, Subcommand};
use goscope_core::query::QueryOptions;
use std::path::PathBuf;

pub use config::ServerConfig;

#[derive(Parser)]
#[command(
    name = "goscope",
    version,
    about = "Prefix search and call graphs over Go source trees",
    long_about = "Goscope indexes every identifier of a Go project (functions, variables and types), \
                  resolves each occurrence to its enclosing function and derives a static call graph \
                  from func main. The index can be explored from an interactive shell, a one-shot \
                  search or a small HTTP server."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive shell over the project index
    Shell {
        /// Project root. Defaults to the current directory.
        #[arg(value_name = "PROJECT_PATH")]
        path: Option<PathBuf>,
    },
    /// Serve search, preview, summary and call graph over HTTP
    #[command(
        long_about = "Starts an HTTP server exposing /search, /preview, /summary.json and \
                            /callstack.json, and serves the static directory for everything else. \
                            The port comes from --port, then the PORT environment variable, then 8080."
    )]
    Serve {
        /// Project root. Defaults to the current directory.
        #[arg(value_name = "PROJECT_PATH")]
        path: Option<PathBuf>,
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
        /// Directory of static assets
        #[arg(long, value_name = "DIR", default_value = config::DEFAULT_STATIC_DIR)]
        static_dir: PathBuf,
    },
    /// Search indexed words starting with a prefix
    Search {
        /// Word prefix
        word: String,
        /// Project root. Defaults to the current directory.
        #[arg(long, value_name = "PROJECT_PATH")]
        path: Option<PathBuf>,
        /// Number of results
        #[arg(short, long)]
        limit: Option<usize>,
        /// Ranking: lex, count or rel
        #[arg(short, long)]
        sort: Option<String>,
        /// Reference kind: all, function, variable or struct
        #[arg(short, long)]
        kind: Option<String>,
        /// Comma separated files to search within
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Write the call graph rooted at func main as JSON
    Graph {
        /// Output file
        #[arg(value_name = "OUTPUT", default_value = graph::DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Project root. Defaults to the current directory.
        #[arg(long, value_name = "PROJECT_PATH")]
        path: Option<PathBuf>,
    },
    /// Print index statistics as JSON
    Summary {
        /// Project root. Defaults to the current directory.
        #[arg(value_name = "PROJECT_PATH")]
        path: Option<PathBuf>,
    },
}

fn project_root(path: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let root = match path {
        Some(p) => p,
        None => std::env::current_dir()?,
    };
    Ok(root.canonicalize()?)
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // The shell owns the terminal, so it only logs to file.
    let (component, to_stderr) = match &cli.command {
        Commands::Shell { .. } => ("shell", false),
        Commands::Serve { .. } => ("serve", true),
        _ => ("cli", true),
    };
    let _guard = goscope_runtime::init_logging(component, to_stderr);

    match cli.command {
        Commands::Shell { path } => shell::run(project_root(path)?),
        Commands::Serve {
            path,
            port,
            static_dir,
        } => {
            let config = ServerConfig::resolve(port, static_dir);
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(serve::run(project_root(path)?, config))
        }
        Commands::Search {
            word,
            path,
            limit,
            sort,
            kind,
            file,
        } => {
            let workspace = goscope_runtime::build_workspace(project_root(path)?)?;
            let limit = limit.map(|l| l.to_string());
            let options = QueryOptions::lenient(
                sort.as_deref(),
                limit.as_deref(),
                kind.as_deref(),
                file.as_deref(),
            );
            println!("{}", shell::render_search(&workspace, &word, &options));
            Ok(())
        }
        Commands::Graph { output, path } => graph::run(project_root(path)?, output),
        Commands::Summary { path } => {
            let workspace = goscope_runtime::build_workspace(project_root(path)?)?;
            println!("{}", serde_json::to_string_pretty(&workspace.summary())?);
            Ok(())
        }
    }
}
