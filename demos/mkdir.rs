mod cli;

use cli::{init_tracing, parse_connection, usage_and_exit};
use fmclient::error::Result;

const USAGE: &str =
    "Usage: cargo run --example mkdir -- [--url URL] [--token TOKEN] [--proxy PROXY] <PARENT> <NAME>";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let conn = parse_connection(USAGE);
    if conn.positionals.len() != 2 {
        usage_and_exit(USAGE);
    }
    let parent = conn.positionals[0].clone();
    let name = conn.positionals[1].clone();

    let explorer = conn.open().await?;

    println!("Creating directory {} in {}", name, parent);
    match explorer.create_directory(&parent, &name).await {
        Ok(()) => {
            println!("Directory created successfully!");
        }
        Err(e) => {
            eprintln!("Failed to create directory: {}", e);
        }
    }

    Ok(())
}
