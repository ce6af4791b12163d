use std::env;
use std::process;

use fmclient::{ClientConfig, Explorer};
use tracing_subscriber::{fmt, EnvFilter};

pub fn usage_and_exit(usage: &str) -> ! {
    eprintln!("{usage}");
    process::exit(1);
}

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fmclient=debug"));
    fmt().with_env_filter(filter).with_target(false).init();
}

pub struct ArgParser {
    args: Vec<String>,
    usage: &'static str,
}

impl ArgParser {
    pub fn new(usage: &'static str) -> Self {
        let args: Vec<String> = env::args().skip(1).collect();

        if args.iter().any(|a| a == "--help" || a == "-h") {
            println!("{usage}");
            process::exit(0);
        }

        Self { args, usage }
    }

    pub fn take_value(&mut self, names: &[&str]) -> Option<String> {
        let mut i = 0;
        while i < self.args.len() {
            if names.contains(&self.args[i].as_str()) {
                let value = self.args.get(i + 1).cloned();
                if value.is_none() {
                    usage_and_exit(self.usage);
                }
                self.args.drain(i..=i + 1);
                return value;
            }
            i += 1;
        }
        None
    }

    pub fn remaining(self) -> Vec<String> {
        self.args
    }
}

/// Service settings from the environment, overridden by `--url`, `--token`
/// and `--proxy`.
pub struct Connection {
    pub config: ClientConfig,
    pub positionals: Vec<String>,
}

pub fn parse_connection(usage: &'static str) -> Connection {
    let mut parser = ArgParser::new(usage);

    let mut config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            usage_and_exit(usage);
        }
    };
    if let Some(url) = parser.take_value(&["--url", "-u"]) {
        config.base_url = url;
    }
    if let Some(token) = parser.take_value(&["--token", "-t"]) {
        config = config.with_token(token);
    }
    if let Some(proxy) = parser.take_value(&["--proxy"]) {
        config = config.with_proxy(proxy);
    }

    Connection {
        config,
        positionals: parser.remaining(),
    }
}

impl Connection {
    /// Build an explorer and load the tree.
    pub async fn open(&self) -> fmclient::Result<Explorer> {
        println!("Connecting to {}...", self.config.base_url);
        let explorer = Explorer::new(self.config.clone())?;
        explorer.refresh().await?;
        Ok(explorer)
    }
}
