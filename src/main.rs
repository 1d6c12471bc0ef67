use boron::{
    application::{Application, ApplicationError},
    cli::Cli,
};
use clap::Parser as _;
use tracing::debug;

#[compio::main]
#[snafu::report]
async fn main() -> Result<(), ApplicationError> {
    let cli_args = Cli::parse();
    setup_tracing(&cli_args);
    debug!(
        "Parsed CLI arguments: config={:?}, bind={:?}, {} session secret(s)",
        cli_args.config,
        cli_args.bind,
        cli_args.session_secrets.len()
    );

    Application::run(cli_args).await?;

    Ok(())
}

fn setup_tracing(cli_args: &Cli) {
    if let Some(level) = cli_args.log_level.to_tracing_level() {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .without_time()
            .compact()
            .with_writer(std::io::stderr)
            .init();
    }
}
