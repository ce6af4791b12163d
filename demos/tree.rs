//! Example: Print the remote tree
//!
//! Usage:
//!   cargo run --example tree -- [--url URL] [--token TOKEN] [--proxy PROXY] [PATH]

mod cli;

use cli::{init_tracing, parse_connection, usage_and_exit};
use fmclient::TreeNode;

const USAGE: &str =
    "Usage: cargo run --example tree -- [--url URL] [--token TOKEN] [--proxy PROXY] [PATH]";

fn print_node(node: &TreeNode, depth: usize) {
    let info = &node.info;
    if info.is_directory {
        println!("{}{}/", "  ".repeat(depth), info.name);
    } else {
        let modified = info
            .last_modified
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{}{} ({} bytes) {}",
            "  ".repeat(depth),
            info.name,
            info.size,
            modified
        );
    }
    for child in node.children() {
        print_node(child, depth + 1);
    }
}

#[tokio::main]
async fn main() -> fmclient::Result<()> {
    init_tracing();
    let conn = parse_connection(USAGE);
    if conn.positionals.len() > 1 {
        usage_and_exit(USAGE);
    }
    let start = conn.positionals.first().cloned().unwrap_or_default();

    let explorer = conn.open().await?;
    let tree = explorer.tree();

    match tree.find(&start) {
        Some(node) => {
            for child in node.children() {
                print_node(child, 0);
            }
            println!("{} nodes total", tree.count());
        }
        None => {
            eprintln!("Not found: {}", start);
            std::process::exit(1);
        }
    }

    Ok(())
}
