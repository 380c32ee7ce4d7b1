use std::time::Duration;

/// Allowed distance between a claim's timestamp and server time.
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_millis(30_000);

pub const DEFAULT_WORKER_INTERVAL: Duration = Duration::from_secs(60);

/// Upper bound on a single `grant` call, receipt wait included.
pub const DEFAULT_LEDGER_TIMEOUT: Duration = Duration::from_secs(120);

pub const DEFAULT_JOBS_FILE: &str = "data/jobs.json";
