use std::sync::Arc;

use quest_points_ethereum_ledger_client::EthereumLedgerClient;
use quest_points_ledger_client_interface::LedgerClient;
use tracing::{info, warn};

use crate::cli::{LedgerCliArgs, RunCmd, WorkerCmd};
use crate::core::client::database::JobStore;
use crate::core::client::{FileJobStore, MongoJobStore};
use crate::error::{ServiceError, ServiceResult};
use crate::intake::IntakePipeline;
use crate::types::params::ledger::validate_ledger_args;
use crate::types::params::{DatabaseParams, ServerParams, ServiceParams};
use crate::validators::QuestValidatorRegistry;

/// Everything the intake server and the settlement worker share.
pub struct Config {
    server_params: ServerParams,
    service_params: ServiceParams,
    database: Arc<dyn JobStore>,
    ledger: Arc<dyn LedgerClient>,
    validators: Arc<QuestValidatorRegistry>,
}

impl Config {
    pub fn new(
        server_params: ServerParams,
        service_params: ServiceParams,
        database: Arc<dyn JobStore>,
        ledger: Arc<dyn LedgerClient>,
        validators: Arc<QuestValidatorRegistry>,
    ) -> Self {
        Self { server_params, service_params, database, ledger, validators }
    }

    /// Builds the configuration for the `run` command.
    pub async fn from_run_cmd(run_cmd: &RunCmd) -> ServiceResult<Self> {
        let server_params = ServerParams::from(run_cmd.server_args.clone());
        let service_params = ServiceParams::from(run_cmd.service_args.clone());
        let database_params = DatabaseParams::try_from(run_cmd.database_args.clone())?;

        if run_cmd.no_worker && !database_params.supports_multiple_processes() {
            return Err(ServiceError::ConfigError(
                "--no-worker needs a store shared with a worker process, use --store mongodb".to_string(),
            ));
        }

        let database = build_database(&database_params).await?;
        let ledger = build_ledger(&run_cmd.ledger_args, &service_params).await?;
        Ok(Self::new(server_params, service_params, database, ledger, Arc::new(build_validators())))
    }

    /// Builds the configuration for the standalone `worker` command.
    pub async fn from_worker_cmd(worker_cmd: &WorkerCmd) -> ServiceResult<Self> {
        let service_params = ServiceParams::from(worker_cmd.service_args.clone());
        let database_params = DatabaseParams::try_from(worker_cmd.database_args.clone())?;

        // A file store is only safe when intake and settlement share one process.
        if !database_params.supports_multiple_processes() {
            return Err(ServiceError::ConfigError(
                "the standalone worker needs --store mongodb, the file store cannot be shared between processes"
                    .to_string(),
            ));
        }

        let database = build_database(&database_params).await?;
        let ledger = build_ledger(&worker_cmd.ledger_args, &service_params).await?;
        Ok(Self::new(ServerParams::default(), service_params, database, ledger, Arc::new(build_validators())))
    }

    pub fn server_params(&self) -> &ServerParams {
        &self.server_params
    }

    pub fn service_params(&self) -> &ServiceParams {
        &self.service_params
    }

    pub fn database(&self) -> Arc<dyn JobStore> {
        self.database.clone()
    }

    pub fn ledger(&self) -> Arc<dyn LedgerClient> {
        self.ledger.clone()
    }

    pub fn validators(&self) -> Arc<QuestValidatorRegistry> {
        self.validators.clone()
    }

    /// The intake pipeline wired to this configuration's store and validators.
    pub fn intake(&self) -> IntakePipeline {
        IntakePipeline::new(self.database(), self.validators(), self.service_params.freshness_window)
    }
}

pub async fn build_database(params: &DatabaseParams) -> ServiceResult<Arc<dyn JobStore>> {
    match params {
        DatabaseParams::File { path } => {
            info!(path = %path.display(), "Using file job store");
            Ok(Arc::new(FileJobStore::new(path.clone()).await?))
        }
        DatabaseParams::MongoDb(mongo) => {
            info!(database = %mongo.database_name, "Using MongoDB job store");
            Ok(Arc::new(MongoJobStore::new(mongo).await?))
        }
    }
}

fn build_validators() -> QuestValidatorRegistry {
    let registry = QuestValidatorRegistry::with_defaults();
    for quest_type in registry.unregistered() {
        warn!(quest_type = %quest_type, "No validator registered, claims of this type will be rejected");
    }
    registry
}

pub async fn build_ledger(args: &LedgerCliArgs, service_params: &ServiceParams) -> ServiceResult<Arc<dyn LedgerClient>> {
    let validated = validate_ledger_args(args, service_params.ledger_timeout)?;
    Ok(Arc::new(EthereumLedgerClient::new_with_args(&validated).await?))
}
