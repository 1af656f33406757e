use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use jsontree::config::Config;
use jsontree::document::parser::parse_json;
use jsontree::document::tree::JsonTree;
use jsontree::document::JsonValue;
use jsontree::file::loader::{
    load_export_file, load_export_from_stdin, load_json_file, load_json_from_stdin,
};
use jsontree::file::saver::{pretty_format, save_json_file, save_value};
use jsontree::logging::init_logging;

/// jsontree - inspect and edit JSON documents as path-addressable trees
#[derive(Parser)]
#[command(name = "jsontree")]
#[command(version)]
#[command(about = "Inspect and edit JSON documents as path-addressable trees", long_about = None)]
struct Cli {
    /// JSON file to load ("-" reads from stdin)
    file: String,

    /// Spaces per indentation level (overrides config)
    #[arg(short, long)]
    indent: Option<usize>,

    /// Write the resulting tree (or export records) to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// FILE holds export records rather than a JSON document
    #[arg(long)]
    from_export: bool,

    /// Tracing filter used when RUST_LOG is unset (overrides config)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tree name
    Name,
    /// List every branch path
    Branches,
    /// Print the branch at PATH
    Get { path: String },
    /// Run a JSONPath expression against the branch at PATH
    Query { path: String, expression: String },
    /// Print the tree as flat export records
    Export,
    /// Add the single-key JSON object DATA under the branch at PATH
    Append { path: String, data: String },
    /// Remove the branch at PATH
    Delete { path: String },
    /// Move the branch at FROM underneath the branch at TO
    Move { from: String, to: String },
    /// Print the last segment of PATH
    PathName { path: String },
    /// Print PATH without its last segment
    PathPrefix { path: String },
}

fn load_tree(cli: &Cli) -> Result<JsonTree> {
    match (cli.file.as_str(), cli.from_export) {
        ("-", false) => load_json_from_stdin(),
        ("-", true) => load_export_from_stdin(),
        (path, false) => load_json_file(path),
        (path, true) => load_export_file(path),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load();
    if let Some(indent) = cli.indent {
        config.indent_size = indent;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    init_logging(&config.log_level);

    let mut tree = load_tree(&cli)?;

    // Commands that only read print their result and return early
    let mutated = match &cli.command {
        Command::Name => return emit_line(tree.tree_name()),
        Command::Branches => {
            for path in tree.get_branches() {
                println!("{}", path);
            }
            return Ok(());
        }
        Command::Get { path } => {
            let node = tree
                .get_branch(path)
                .ok_or_else(|| anyhow!("Path not found: {}", path))?;
            return emit(node, &cli, &config);
        }
        Command::Query { path, expression } => {
            let matches = tree
                .query(path, expression)?
                .ok_or_else(|| anyhow!("Path not found: {}", path))?;
            let results = JsonValue::Array(matches.into_iter().cloned().collect());
            return emit(&results, &cli, &config);
        }
        Command::Export => {
            let records = serde_json::to_value(tree.export_tree())
                .context("Failed to serialize export records")?;
            return emit(&JsonValue::from(records), &cli, &config);
        }
        Command::PathName { path } => {
            return emit_line(&tree.get_path_name(path).unwrap_or_default())
        }
        Command::PathPrefix { path } => return emit_line(&tree.get_path_prefix(path)),
        Command::Append { path, data } => {
            let data = parse_json(data).context("Invalid branch data")?;
            tree.try_append_branch(path, data)
        }
        Command::Delete { path } => tree.try_delete_branch(path).map(|_| ()),
        Command::Move { from, to } => tree.try_move_branch(from, to),
    };
    mutated?;

    match &cli.output {
        Some(output) => save_json_file(output, &tree, &config),
        None => emit_line(&pretty_format(tree.tree(), config.indent_size)),
    }
}

fn emit(value: &JsonValue, cli: &Cli, config: &Config) -> Result<()> {
    match &cli.output {
        Some(output) => save_value(output, value, config),
        None => emit_line(&pretty_format(value, config.indent_size)),
    }
}

fn emit_line(text: &str) -> Result<()> {
    println!("{}", text);
    Ok(())
}
