use bootstrap::StartupError;
use clap::Parser;
use dns_relay_domain::{CliOverrides, Config};
use dns_relay_jobs::JobRunner;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "dns-relay")]
#[command(version)]
#[command(about = "DNS query relay with forwarding and iterative resolution")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Listening port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("dns-relay: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), StartupError> {
    let cli_overrides = CliOverrides {
        port: cli.port,
        bind_address: cli.bind.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config.logging);

    serve(config)
        .await
        .inspect_err(|e| error!(error = %e, "Startup failed"))
}

async fn serve(config: Config) -> Result<(), StartupError> {
    info!("Starting DNS relay v{}", env!("CARGO_PKG_VERSION"));

    let services = di::Services::build(&config).await?;

    let shutdown = CancellationToken::new();
    let mut runner = JobRunner::new().with_shutdown_token(shutdown.clone());
    let status = services.registration.as_ref().map(|job| job.status());
    if let Some(job) = services.registration {
        runner = runner.with_registration(job);
    }
    runner.start().await;

    if let Some(mut status) = status {
        tokio::spawn(async move {
            status.wait_registered().await;
            info!("Instance is discoverable");
        });
    }

    let socket = server::bind_query_socket(&config.server)
        .map_err(StartupError::Bind)?;

    tokio::select! {
        _ = services.query_server.serve(socket) => {
            warn!("Query server stopped");
        }
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                warn!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received");
        }
    }

    shutdown.cancel();
    info!("Server shutdown complete");
    Ok(())
}
