use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Paste a list of file paths and get a themed directory tree back.
#[derive(Parser, Clone)]
#[command(version)]
pub struct Cli {
    /// YAML config file. Defaults to `boron.yaml` in the working directory when present
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    /// Address to listen on, overriding the config file
    #[clap(long, short)]
    pub bind: Option<SocketAddr>,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Secret for signing the session cookie. The first one signs, all of them verify
    #[clap(
        long = "session-secret",
        env = "SESSION_SECRET",
        value_delimiter = ',',
        hide_env_values = true
    )]
    pub session_secrets: Vec<String>,
}
