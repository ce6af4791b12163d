//! Example: Upload a file
//!
//! Files larger than the chunk threshold (`FM_CHUNK_SIZE`, 4 MiB by default)
//! are sent in sequential chunks with a progress bar.
//!
//! Usage:
//!   cargo run --example upload -- [--url URL] [--token TOKEN] [--proxy PROXY] <LOCAL_FILE> <REMOTE_DIR>

mod cli;

use std::process;

use cli::{init_tracing, parse_connection, usage_and_exit};
use fmclient::progress::{ProgressCallback, TransferProgress};
use indicatif::{ProgressBar, ProgressStyle};

const USAGE: &str = "Usage: cargo run --example upload -- [--url URL] [--token TOKEN] [--proxy PROXY] <LOCAL_FILE> <REMOTE_DIR>";

#[tokio::main]
async fn main() -> fmclient::Result<()> {
    init_tracing();
    let conn = parse_connection(USAGE);
    if conn.positionals.len() != 2 {
        usage_and_exit(USAGE);
    }
    let local_file = &conn.positionals[0];
    let remote_dir = &conn.positionals[1];

    let explorer = conn.open().await?;

    let progress_bar = ProgressBar::new(0);
    progress_bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    let bar = progress_bar.clone();
    let callback: ProgressCallback = Box::new(move |progress: &TransferProgress| {
        bar.set_length(progress.total);
        bar.set_position(progress.done);
        bar.set_message(format!(
            "chunk {}/{}",
            progress.chunk_number, progress.total_chunks
        ));
        if progress.is_complete() {
            bar.finish_with_message(format!("{} complete", progress.filename));
        }
    });

    println!("Uploading {} to {}...", local_file, remote_dir);
    match explorer
        .upload_file(remote_dir, local_file, Some(callback))
        .await
    {
        Ok(()) => {
            progress_bar.finish_and_clear();
            println!("Upload complete!");
        }
        Err(e) => {
            progress_bar.abandon();
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    Ok(())
}
