use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[cfg(unix)]
use signal::unix::{signal, SignalKind};

/// What ended the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ShutdownSignal {
    #[strum(serialize = "SIGTERM")]
    Terminate,
    #[strum(serialize = "SIGINT")]
    Interrupt,
    #[strum(serialize = "SIGQUIT")]
    Quit,
    /// A component cancelled the shared token, e.g. the HTTP server died.
    #[strum(serialize = "INTERNAL")]
    Internal,
}

/// Waits for an OS signal or an internal cancellation, then runs a bounded shutdown.
pub struct SignalHandler {
    shutdown_signal: Option<ShutdownSignal>,
    cancellation_token: CancellationToken,
}

impl SignalHandler {
    pub fn new(cancellation_token: CancellationToken) -> Self {
        Self { shutdown_signal: None, cancellation_token }
    }

    /// Token cancelled once shutdown begins. Components stop when it fires.
    pub fn token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    /// Waits for any shutdown signal, cancels the token and returns the signal.
    pub async fn wait_for_shutdown(&mut self) -> Result<ShutdownSignal> {
        let signal = self.wait_for_signal().await?;
        self.shutdown_signal = Some(signal);
        info!(signal = %signal, "Received shutdown signal");
        self.cancellation_token.cancel();
        Ok(signal)
    }

    pub fn shutdown_signal(&self) -> Option<ShutdownSignal> {
        self.shutdown_signal
    }

    #[cfg(unix)]
    async fn wait_for_signal(&self) -> Result<ShutdownSignal> {
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigquit = signal(SignalKind::quit())?;

        Ok(tokio::select! {
            _ = sigterm.recv() => ShutdownSignal::Terminate,
            _ = sigint.recv() => ShutdownSignal::Interrupt,
            _ = sigquit.recv() => {
                warn!("Force quit signal received (SIGQUIT)");
                ShutdownSignal::Quit
            }
            _ = self.cancellation_token.cancelled() => ShutdownSignal::Internal,
        })
    }

    #[cfg(not(unix))]
    async fn wait_for_signal(&self) -> Result<ShutdownSignal> {
        Ok(tokio::select! {
            result = signal::ctrl_c() => {
                result?;
                ShutdownSignal::Interrupt
            }
            _ = self.cancellation_token.cancelled() => ShutdownSignal::Internal,
        })
    }

    /// Runs `shutdown_fn`, giving up after `timeout`. SIGQUIT exits the process on timeout.
    pub async fn handle_graceful_shutdown<F, Fut>(&self, shutdown_fn: F, timeout: Duration) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let signal = self.shutdown_signal.unwrap_or(ShutdownSignal::Interrupt);
        info!(signal = %signal, timeout_secs = timeout.as_secs(), "Starting graceful shutdown");

        match tokio::time::timeout(timeout, shutdown_fn()).await {
            Ok(Ok(())) => {
                info!("Graceful shutdown completed");
                Ok(())
            }
            Ok(Err(e)) => {
                error!(error = %e, "Graceful shutdown failed");
                Err(e)
            }
            Err(_) => {
                error!(timeout_secs = timeout.as_secs(), "Graceful shutdown timed out");
                if signal == ShutdownSignal::Quit {
                    warn!("SIGQUIT received, forcing immediate exit");
                    std::process::exit(1);
                }
                Err(anyhow!("Shutdown timeout exceeded"))
            }
        }
    }
}
