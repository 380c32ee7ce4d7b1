use clap::{Parser, Subcommand};

pub mod database;
pub mod ledger;
pub mod server;
pub mod service;
pub mod sign;

pub use database::{DatabaseCliArgs, StoreKind};
pub use ledger::LedgerCliArgs;
pub use server::ServerCliArgs;
pub use service::ServiceCliArgs;
pub use sign::SignClaimCmd;

#[derive(Parser, Debug)]
#[command(
    name = "quest-points",
    about = "Quest Points - verifies wallet-signed quest claims and settles them on-chain",
    after_help = "Examples:\n  \
    quest-points run --rpc-url http://localhost:8545 --contract-address 0x... --private-key 0x...\n  \
    quest-points worker --store mongodb --mongodb-connection-url mongodb://localhost:27017 ...\n  \
    quest-points sign-claim --private-key 0x... --quest-id daily-login-004 --submit http://localhost:3000"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP intake server, with the settlement worker in the same process
    Run {
        #[command(flatten)]
        run_command: Box<RunCmd>,
    },
    /// Run only the settlement worker against a shared MongoDB store
    Worker {
        #[command(flatten)]
        worker_command: Box<WorkerCmd>,
    },
    /// Sign a claim with a wallet key and print or submit it
    SignClaim {
        #[command(flatten)]
        sign_command: Box<SignClaimCmd>,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct RunCmd {
    #[clap(flatten)]
    pub server_args: ServerCliArgs,

    #[clap(flatten)]
    pub service_args: ServiceCliArgs,

    #[clap(flatten)]
    pub database_args: DatabaseCliArgs,

    #[clap(flatten)]
    pub ledger_args: LedgerCliArgs,

    /// Serve intake only. Requires a worker process on the same MongoDB store.
    #[arg(env = "QUEST_POINTS_NO_WORKER", long, default_value_t = false)]
    pub no_worker: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct WorkerCmd {
    #[clap(flatten)]
    pub service_args: ServiceCliArgs,

    #[clap(flatten)]
    pub database_args: DatabaseCliArgs,

    #[clap(flatten)]
    pub ledger_args: LedgerCliArgs,
}
