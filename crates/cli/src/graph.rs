use std::path::PathBuf;
use tracing::info;

pub const DEFAULT_OUTPUT: &str = "callstack.json";

pub fn run(root: PathBuf, output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let workspace = goscope_runtime::build_workspace(root)?;
    let graph = workspace
        .call_graph()
        .ok_or("no entry function: the project declares no func main")?;

    graph.write(&output)?;
    info!(
        "wrote call graph ({} nodes, max depth {}) to {}",
        graph.node_count(),
        graph.max_depth(),
        output.display()
    );
    println!("{}", output.display());
    Ok(())
}
