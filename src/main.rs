//! nodetree - an in-memory directory/file tree.
//!
//! Usage:
//!   nodetree                        Run the demonstration
//!   nodetree ls [PATH]              List the demo tree from PATH
//!   nodetree find PATH              Resolve PATH from the root
//!   nodetree delete PATH [-f]       Delete a node, then list the tree
//!   nodetree stats [PATH]           Show subtree statistics
//!   nodetree export [PATH]          Export a JSON snapshot
//!   nodetree --help                 Show help

mod listing;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use nodetree_core::{Clock, NodeId, NodeTree, TreeSnapshot, TreeStats};

use listing::{SizeStyle, format_info, format_size};

#[derive(Parser)]
#[command(
    name = "nodetree",
    version,
    about = "An in-memory directory/file tree",
    long_about = "nodetree builds a small in-memory hierarchy of directories and files \
                  and exercises creation, lookup, traversal and deletion on it.\n\n\
                  Run without a subcommand to see the demonstration."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build the demo tree, walk it and resolve a few paths
    Demo,

    /// List a subtree of the demo tree in pre-order
    Ls {
        /// Path relative to the root
        #[arg(default_value = "/")]
        path: String,

        /// Show payload sizes in human-readable units
        #[arg(short = 'H', long)]
        human: bool,
    },

    /// Resolve a path in the demo tree
    Find {
        /// Path to resolve
        path: String,

        /// Directory to resolve from (defaults to the root)
        #[arg(long, default_value = "/")]
        from: String,
    },

    /// Delete a node of the demo tree and list what remains
    Delete {
        /// Path of the node to delete
        path: String,

        /// Delete options; `--force` or `-f` unlink the node, anything else
        /// only marks it deleted
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        options: Vec<String>,
    },

    /// Show statistics for a subtree of the demo tree
    Stats {
        /// Path relative to the root
        #[arg(default_value = "/")]
        path: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Export the demo tree as a JSON snapshot
    Export {
        /// Path relative to the root
        #[arg(default_value = "/")]
        path: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Ids of the nodes created by [`build_demo_tree`].
struct DemoNodes {
    dir2: NodeId,
    file1: NodeId,
    file2: NodeId,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        None | Some(Command::Demo) => run_demo()?,
        Some(Command::Ls { path, human }) => {
            let style = if human {
                SizeStyle::Human
            } else {
                SizeStyle::Bytes
            };
            run_ls(&path, style)?;
        }
        Some(Command::Find { path, from }) => run_find(&path, &from)?,
        Some(Command::Delete { path, options }) => run_delete(&path, &options)?,
        Some(Command::Stats { path, format }) => run_stats(&path, format)?,
        Some(Command::Export { path, output }) => run_export(&path, output)?,
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` overrides the level picked by `-v`.
fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_env_filter(filter)
        .init();
}

/// root -> dir1 -> file1.txt, root -> dir2 -> file2.txt
fn build_demo_tree() -> Result<(NodeTree, DemoNodes)> {
    let mut tree = NodeTree::new();
    let root = tree.root();

    let dir1 = tree.create_directory("dir1", root)?;
    let file1 = tree.create_file("file1.txt", dir1, "Hello, World!")?;
    let dir2 = tree.create_directory("dir2", root)?;
    let file2 = tree.create_file("file2.txt", dir2, "Another file content.")?;

    tracing::info!(nodes = tree.node_count(), "built demo tree");
    Ok((tree, DemoNodes { dir2, file1, file2 }))
}

fn print_info<C: Clock>(tree: &NodeTree<C>, id: NodeId, style: SizeStyle) -> Result<()> {
    println!("{}", format_info(tree.get(id)?, style));
    Ok(())
}

fn print_subtree<C: Clock>(tree: &NodeTree<C>, id: NodeId, style: SizeStyle) -> Result<()> {
    tree.walk(id, |node| println!("{}", format_info(node, style)))?;
    Ok(())
}

/// Walk and print the demo tree, then resolve two paths.
fn run_demo() -> Result<()> {
    let (tree, nodes) = build_demo_tree()?;
    let root = tree.root();
    let style = SizeStyle::Bytes;

    print_subtree(&tree, root, style)?;
    print_info(&tree, root, style)?;
    print_info(&tree, nodes.file1, style)?;
    print_info(&tree, nodes.file2, style)?;

    println!("Finding dir1/file1.txt:");
    match tree.find(root, "dir1/file1.txt") {
        Ok(id) => print_info(&tree, id, style)?,
        Err(e) => println!("Error: {e}"),
    }

    println!("Finding file2.txt in dir2:");
    match tree.find(nodes.dir2, "file2.txt") {
        Ok(id) => print_info(&tree, id, style)?,
        Err(e) => println!("Error: {e}"),
    }

    Ok(())
}

fn run_ls(path: &str, style: SizeStyle) -> Result<()> {
    let (tree, _) = build_demo_tree()?;
    let id = tree.find(tree.root(), path)?;
    print_subtree(&tree, id, style)
}

fn run_find(path: &str, from: &str) -> Result<()> {
    let (tree, _) = build_demo_tree()?;
    let start = tree
        .find(tree.root(), from)
        .wrap_err_with(|| format!("Invalid starting directory {from:?}"))?;

    match tree.find(start, path) {
        Ok(id) => {
            println!("{}", tree.path_of(id)?);
            print_info(&tree, id, SizeStyle::Bytes)?;
        }
        Err(e) => println!("Error: {e}"),
    }
    Ok(())
}

fn run_delete(path: &str, options: &[String]) -> Result<()> {
    let (mut tree, _) = build_demo_tree()?;
    let root = tree.root();
    let id = tree.find(root, path)?;
    let display_path = tree.path_of(id)?;

    let mode = tree.delete(id, options)?;
    println!("{mode}-deleted {display_path}");
    println!();

    tree.walk(root, |node| {
        let marker = if node.is_deleted() { " (deleted)" } else { "" };
        println!("{}{}", format_info(node, SizeStyle::Bytes), marker);
    })?;
    Ok(())
}

fn run_stats(path: &str, format: OutputFormat) -> Result<()> {
    let (tree, _) = build_demo_tree()?;
    let id = tree.find(tree.root(), path)?;
    let stats = TreeStats::collect(&tree, id)?;

    match format {
        OutputFormat::Text => {
            println!("{}", "─".repeat(40));
            println!(" {}", tree.path_of(id)?);
            println!("{}", "─".repeat(40));
            println!(
                " {} files, {} directories",
                stats.total_files, stats.total_dirs
            );
            println!(" {} deleted", stats.total_deleted);
            println!(
                " {} of payload",
                format_size(stats.total_bytes, SizeStyle::Human)
            );
            println!(" Max depth: {}", stats.max_depth);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}

fn run_export(path: &str, output: Option<PathBuf>) -> Result<()> {
    let (tree, _) = build_demo_tree()?;
    let id = tree.find(tree.root(), path)?;
    let snapshot = TreeSnapshot::capture(&tree, id)?;

    let json = serde_json::to_string_pretty(&snapshot)?;

    match output {
        Some(output_path) => {
            std::fs::write(&output_path, json)
                .wrap_err_with(|| format!("Failed to write {}", output_path.display()))?;
            eprintln!("Exported to {}", output_path.display());
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}
