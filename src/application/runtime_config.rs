use std::net::SocketAddr;
use std::path::PathBuf;

use crate::cli::Cli;

/// Command line settings that outrank the config file.
#[derive(Clone)]
pub struct RuntimeConfig {
    pub config: Option<PathBuf>,
    pub bind: Option<SocketAddr>,
    pub session_secrets: Vec<String>,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            config: cli.config,
            bind: cli.bind,
            session_secrets: cli
                .session_secrets
                .into_iter()
                .map(|secret| secret.trim().to_string())
                .filter(|secret| !secret.is_empty())
                .collect(),
        }
    }
}
