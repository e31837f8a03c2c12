mod cli;
mod error;
mod input;
mod output;

use clap::Parser;
use cli::Cli;
use error::{exit_with_error, CliError, CliResult};
use fluree_remote_client::{ClientConfig, QueryClient};
use std::io::Write;

fn init_tracing(cli: &Cli) {
    // --quiet   -> "off"
    // --verbose -> RUST_LOG, or "info"
    // default   -> RUST_LOG, or "warn"
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else {
        let fallback = if cli.verbose { "info" } else { "warn" };
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into())
    };

    let ansi = !(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing(&cli);

    if let Err(e) = run(cli) {
        exit_with_error(e);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    cli.validate().map_err(CliError::Usage)?;

    let query = input::read_query(cli.query.as_deref(), cli.file.as_deref())?;
    let params = cli
        .params
        .iter()
        .map(|p| input::parse_param(p))
        .collect::<CliResult<Vec<_>>>()?;

    let token = cli
        .load_token()
        .map_err(|e| CliError::Input(format!("failed to read token file: {e}")))?;

    let mut config = ClientConfig::new(cli.endpoint.clone());
    config.auth_token = token;
    config.connect_timeout_secs = cli.connect_timeout;
    if let Some(limit) = cli.memory_limit {
        config.spill.memory_limit = limit;
    }
    if let Some(dir) = &cli.spill_dir {
        config.spill.temp_dir = Some(dir.clone());
    }

    let client = QueryClient::new(config)?;
    let response = client.execute_query(&query, params, cli.timeout)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let rows = output::render(response, cli.format, client.registry(), &mut out)?;
    out.flush()?;
    tracing::info!(rows, endpoint = %cli.endpoint, "query complete");
    Ok(())
}
