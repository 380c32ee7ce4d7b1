use std::time::Duration;

use crate::cli::server::ServerCliArgs;
use crate::cli::service::ServiceCliArgs;
use crate::types::constant::{DEFAULT_FRESHNESS_WINDOW, DEFAULT_LEDGER_TIMEOUT, DEFAULT_WORKER_INTERVAL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceParams {
    pub worker_interval: Duration,
    pub freshness_window: Duration,
    pub ledger_timeout: Duration,
    pub shutdown_timeout_secs: u64,
}

impl Default for ServiceParams {
    fn default() -> Self {
        Self {
            worker_interval: DEFAULT_WORKER_INTERVAL,
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
            ledger_timeout: DEFAULT_LEDGER_TIMEOUT,
            shutdown_timeout_secs: 30,
        }
    }
}

impl From<ServiceCliArgs> for ServiceParams {
    fn from(args: ServiceCliArgs) -> Self {
        Self {
            worker_interval: Duration::from_secs(args.worker_interval_secs),
            freshness_window: Duration::from_millis(args.freshness_window_ms),
            ledger_timeout: Duration::from_secs(args.ledger_timeout_secs),
            shutdown_timeout_secs: args.shutdown_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerParams {
    pub host: String,
    pub port: u16,
}

impl Default for ServerParams {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 3000 }
    }
}

impl From<ServerCliArgs> for ServerParams {
    fn from(value: ServerCliArgs) -> Self {
        Self { host: value.host, port: value.port }
    }
}
