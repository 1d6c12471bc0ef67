use std::net::SocketAddr;
use std::path::Path;

use colored::Colorize;
use snafu::prelude::*;
use supports_color::Stream;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::config::{AppConfig, ConfigError};
use crate::controller::Controller;
use crate::server::{Server, ServerError};
use crate::session::{SessionStore, SessionStoreCreationError};

pub struct Application;

impl Application {
    pub async fn run(runtime_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let runtime_config: RuntimeConfig = runtime_config.into();
        let mut config = AppConfig::load(runtime_config.config.as_deref(), Path::new("."))
            .await
            .context(ConfigStageSnafu)?;
        if let Some(bind) = runtime_config.bind {
            debug!("Bind address overridden from the command line: {}", bind);
            config.bind = bind;
        }
        debug!("Loaded config: {:?}", config);

        let store = SessionStore::new(&runtime_config.session_secrets, config.theme.clone())
            .context(NoSessionSecretSnafu)?;
        let controller = Controller::new(store, config.icons);

        let server = Server::bind(config.bind, controller).context(ServerStageSnafu)?;
        print_banner(server.local_addr().unwrap_or(config.bind));

        server.serve().await.context(ServerStageSnafu)?;
        info!("Server stopped");

        Ok(())
    }
}

fn print_banner(address: SocketAddr) {
    colored::control::set_override(supports_color::on(Stream::Stderr).is_some());
    eprintln!(
        "{} listening on {}",
        "Boron Files".bold().green(),
        format!("http://{address}").cyan().underline()
    );
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigStageError { source: ConfigError },
    #[snafu(display(
        "No session secret configured, pass --session-secret or set SESSION_SECRET"
    ))]
    NoSessionSecret { source: SessionStoreCreationError },
    #[snafu(display("Critical failure encountered while serving requests"))]
    ServerStageError { source: ServerError },
}
