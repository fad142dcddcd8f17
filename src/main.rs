use datatale::cli::{Cli, CliHandler};
use datatale::config;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Missing or invalid arguments are a startup failure.
    let cli = match Cli::parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    init_tracing(cli.verbose);

    // Fail-fast precondition: no credential, no work, no HTTP.
    let api_token = match config::resolve_api_token() {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("{e}");
            process::exit(1);
        }
    };

    let handler = CliHandler::new(cli, api_token);
    let exit_code = match handler.run().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "datatale=debug,info" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // Diagnostics go to stderr; stdout stays free for the shell.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
