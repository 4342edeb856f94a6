// CLI module for emopoem

use clap::Parser;
use std::path::PathBuf;

/// emopoem - reads the emotion in a face and answers with a poem
#[derive(Parser, Debug)]
#[command(name = "emopoem", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (default: ~/.emopoem/config.toml if present)
    #[arg(long, short = 'c', env = "EMOPOEM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override server.host
    #[arg(long)]
    pub host: Option<String>,

    /// Override server.port
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

impl Args {
    /// Apply flag overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut crate::config::AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
