mod cli;

use cli::{init_tracing, parse_connection, usage_and_exit};
use fmclient::error::Result;

const USAGE: &str =
    "Usage: cargo run --example rm -- [--url URL] [--token TOKEN] [--proxy PROXY] <PATH>";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let conn = parse_connection(USAGE);
    if conn.positionals.len() != 1 {
        usage_and_exit(USAGE);
    }
    let target = conn.positionals[0].clone();

    let explorer = conn.open().await?;
    if explorer.find(&target).is_none() {
        eprintln!("Not found: {}", target);
        std::process::exit(1);
    }

    println!("Removing: {}", target);
    match explorer.remove(&target).await {
        Ok(()) => {
            println!("Removed successfully!");
        }
        Err(e) => {
            eprintln!("Failed to remove: {}", e);
        }
    }

    Ok(())
}
