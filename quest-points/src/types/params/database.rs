use std::path::PathBuf;

use crate::cli::database::{DatabaseCliArgs, StoreKind};
use crate::error::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoDbParams {
    pub connection_uri: String,
    pub database_name: String,
}

/// Which job store backs the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseParams {
    File { path: PathBuf },
    MongoDb(MongoDbParams),
}

impl DatabaseParams {
    /// Whether a worker in another process can safely share this store.
    pub fn supports_multiple_processes(&self) -> bool {
        matches!(self, DatabaseParams::MongoDb(_))
    }
}

impl TryFrom<DatabaseCliArgs> for DatabaseParams {
    type Error = ServiceError;

    fn try_from(args: DatabaseCliArgs) -> Result<Self, Self::Error> {
        match args.store {
            StoreKind::File => Ok(DatabaseParams::File { path: args.store_path }),
            StoreKind::Mongodb => {
                let connection_uri = args.mongodb_connection_url.ok_or_else(|| {
                    ServiceError::ConfigError(
                        "QUEST_POINTS_MONGODB_CONNECTION_URL is required with --store mongodb".to_string(),
                    )
                })?;
                Ok(DatabaseParams::MongoDb(MongoDbParams { connection_uri, database_name: args.database_name }))
            }
        }
    }
}
