use clap::Args;

#[derive(Debug, Clone, Args)]
#[group()]
pub struct ServiceCliArgs {
    /// Seconds between two settlement cycles.
    #[arg(
        env = "QUEST_POINTS_WORKER_INTERVAL_SECS",
        long,
        default_value = "60",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub worker_interval_secs: u64,

    /// Allowed clock skew between a claim timestamp and server time, in milliseconds.
    #[arg(env = "QUEST_POINTS_FRESHNESS_WINDOW_MS", long, default_value = "30000")]
    pub freshness_window_ms: u64,

    /// Upper bound on one ledger grant, receipt wait included.
    #[arg(
        env = "QUEST_POINTS_LEDGER_TIMEOUT_SECS",
        long,
        default_value = "120",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub ledger_timeout_secs: u64,

    /// Time allowed for in-flight requests and the current settlement cycle to finish on shutdown.
    #[arg(env = "QUEST_POINTS_SHUTDOWN_TIMEOUT_SECS", long, default_value = "30")]
    pub shutdown_timeout_secs: u64,
}
