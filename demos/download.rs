//! Example: Download a file
//!
//! Usage:
//!   cargo run --example download -- [--url URL] [--token TOKEN] [--proxy PROXY] <REMOTE_PATH> <LOCAL_PATH>

mod cli;

use cli::{init_tracing, parse_connection, usage_and_exit};
use fmclient::error::{FmError, Result};

const USAGE: &str = "Usage: cargo run --example download -- [--url URL] [--token TOKEN] [--proxy PROXY] <REMOTE_PATH> <LOCAL_PATH>";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let conn = parse_connection(USAGE);
    if conn.positionals.len() != 2 {
        usage_and_exit(USAGE);
    }
    let remote_path = conn.positionals[0].clone();
    let local_path = conn.positionals[1].clone();

    let explorer = conn.open().await?;

    println!("Looking for: {}", remote_path);
    let node = explorer
        .find(&remote_path)
        .ok_or_else(|| FmError::Validation(format!("File not found: {}", remote_path)))?;
    if node.is_directory() {
        return Err(FmError::Validation(format!(
            "{} is a directory",
            remote_path
        )));
    }
    println!("Found: {} ({} bytes)", node.info.name, node.info.size);

    println!("Downloading to: {}", local_path);
    let written = explorer.download_to_file(&remote_path, &local_path).await?;

    println!("Download complete! {} bytes written", written);

    Ok(())
}
