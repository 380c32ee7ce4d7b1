use std::sync::Arc;
use std::time::Duration;

use alloy::signers::local::PrivateKeySigner;
use chrono::Utc;
use clap::Parser as _;
use dotenvy::dotenv;
use quest_points::cli::{Cli, Commands, RunCmd, SignClaimCmd, WorkerCmd};
use quest_points::core::config::Config;
use quest_points::intake::signature;
use quest_points::server::setup_server;
use quest_points::types::{ClaimMessage, SignedClaim};
use quest_points::utils::logging::init_logging;
use quest_points::utils::signal_handler::SignalHandler;
use quest_points::worker::initialize_worker;
use quest_points::{ServiceError, ServiceResult};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    dotenv().ok();
    init_logging()?;
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run { run_command } => {
            info!("Starting quest points service");
            run_service(run_command).await
        }
        Commands::Worker { worker_command } => {
            info!("Starting standalone settlement worker");
            run_worker(worker_command).await
        }
        Commands::SignClaim { sign_command } => sign_claim(sign_command).await,
    };

    if let Err(e) = &result {
        error!(error = %e, error_chain = ?e, "Quest points exited with an error");
    }
    result.map_err(color_eyre::Report::from)
}

async fn run_service(run_cmd: &RunCmd) -> ServiceResult<()> {
    let config = Arc::new(Config::from_run_cmd(run_cmd).await?);
    debug!("Configuration initialized");

    let mut signal_handler = SignalHandler::new(CancellationToken::new());
    let token = signal_handler.token();

    let (address, server_handle) = setup_server(config.clone(), token.child_token()).await?;
    info!(address = %address, "Intake server started");

    let worker_handle = if run_cmd.no_worker {
        info!("Settlement worker disabled, expecting a separate worker process");
        None
    } else {
        Some(initialize_worker(config.clone(), token.child_token()))
    };

    signal_handler.wait_for_shutdown().await?;

    let timeout = Duration::from_secs(config.service_params().shutdown_timeout_secs);
    signal_handler
        .handle_graceful_shutdown(
            || async move {
                server_handle.shutdown().await?;
                if let Some(worker_handle) = worker_handle {
                    worker_handle.shutdown().await?;
                }
                Ok(())
            },
            timeout,
        )
        .await?;

    info!("Quest points service stopped");
    Ok(())
}

async fn run_worker(worker_cmd: &WorkerCmd) -> ServiceResult<()> {
    let config = Arc::new(Config::from_worker_cmd(worker_cmd).await?);

    let mut signal_handler = SignalHandler::new(CancellationToken::new());
    let worker_handle = initialize_worker(config.clone(), signal_handler.token().child_token());

    signal_handler.wait_for_shutdown().await?;

    let timeout = Duration::from_secs(config.service_params().shutdown_timeout_secs);
    signal_handler
        .handle_graceful_shutdown(
            || async move {
                worker_handle.shutdown().await?;
                Ok(())
            },
            timeout,
        )
        .await?;
    Ok(())
}

/// Signs a claim for the key's own wallet and prints it, or submits it when `--submit` is set.
#[allow(clippy::print_stdout)]
async fn sign_claim(cmd: &SignClaimCmd) -> ServiceResult<()> {
    let signer: PrivateKeySigner =
        cmd.private_key.parse().map_err(|e| ServiceError::ConfigError(format!("Invalid claim key: {}", e)))?;

    let message = ClaimMessage {
        wallet: signer.address().to_checksum(None),
        quest_id: cmd.quest_id.clone(),
        quest_type: cmd.quest_type.clone(),
        timestamp: cmd.timestamp.unwrap_or_else(|| Utc::now().timestamp_millis()),
    };
    let claim = SignedClaim { signature: signature::sign(&signer, &message)?, message };

    let Some(base_url) = &cmd.submit else {
        let body = serde_json::to_string_pretty(&claim).map_err(anyhow::Error::from)?;
        println!("{}", body);
        return Ok(());
    };

    let url = base_url.join("points").map_err(|e| ServiceError::ConfigError(format!("Invalid submit url: {}", e)))?;
    let response = reqwest::Client::new().post(url.clone()).json(&claim).send().await.map_err(anyhow::Error::from)?;
    let status = response.status();
    let body = response.text().await.map_err(anyhow::Error::from)?;
    info!(url = %url, status = status.as_u16(), "Claim submitted");
    println!("{} {}", status, body);
    Ok(())
}
