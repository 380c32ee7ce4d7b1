use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::types::constant::DEFAULT_JOBS_FILE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// A single JSON file, rewritten on every mutation. Server and worker must share a process.
    File,
    /// A MongoDB collection. Server and worker may run as separate processes.
    Mongodb,
}

/// Parameters used to config the job store.
#[derive(Debug, Clone, Args)]
#[group()]
pub struct DatabaseCliArgs {
    /// Which backend holds the settlement jobs.
    #[arg(env = "QUEST_POINTS_STORE", long, value_enum, default_value_t = StoreKind::File)]
    pub store: StoreKind,

    /// Location of the jobs file when `--store file` is used.
    #[arg(env = "QUEST_POINTS_STORE_PATH", long, default_value = DEFAULT_JOBS_FILE)]
    pub store_path: PathBuf,

    /// The connection string to the MongoDB server.
    #[arg(env = "QUEST_POINTS_MONGODB_CONNECTION_URL", long)]
    pub mongodb_connection_url: Option<String>,

    /// The name of the database.
    #[arg(env = "QUEST_POINTS_DATABASE_NAME", long, default_value = "quest_points")]
    pub database_name: String,
}
