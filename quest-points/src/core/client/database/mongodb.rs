use std::sync::Arc;
use std::time::Instant;

use alloy::primitives::Address;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument, UpdateOptions};
use mongodb::{bson, Client, Collection, Database, IndexModel};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use super::constant::{CLAIM_INDEX_NAME, DUPLICATE_KEY_ERROR_CODE, JOBS_COLLECTION};
use super::{check_transition, DatabaseError, JobStore};
use crate::types::jobs::{EnqueueOutcome, JobItem, JobItemUpdates, JobStatus};
use crate::types::params::MongoDbParams;

pub trait ToDocument {
    fn to_document(&self) -> Result<Document, DatabaseError>;
}

impl<T: Serialize> ToDocument for T {
    fn to_document(&self) -> Result<Document, DatabaseError> {
        let doc = bson::to_bson(self)?;

        if let Bson::Document(doc) = doc {
            Ok(doc)
        } else {
            Err(DatabaseError::FailedToSerializeDocument(format!("Failed to serialize document: {}", doc)))
        }
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) => we.code == DUPLICATE_KEY_ERROR_CODE,
        ErrorKind::Command(ce) => ce.code == DUPLICATE_KEY_ERROR_CODE,
        _ => false,
    }
}

fn claim_filter(wallet: &Address, quest_id: &str) -> Document {
    doc! {
        "wallet": wallet.to_checksum(None),
        "quest_id": quest_id,
    }
}

/// Job store backed by a MongoDB collection.
///
/// Dedup is enforced by a unique `(wallet, quest_id)` index and status
/// transitions by conditional updates, so intake and the worker may live in
/// different processes.
pub struct MongoJobStore {
    client: Client,
    database: Arc<Database>,
}

impl MongoJobStore {
    pub async fn new(config: &MongoDbParams) -> Result<Self, DatabaseError> {
        let client = Client::with_uri_str(&config.connection_uri).await?;
        let database = Arc::new(client.database(&config.database_name));
        let store = Self { client, database };
        store.ensure_indexes().await?;
        Ok(store)
    }

    /// Mongodb client uses Arc internally, reducing the cost of clone.
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    fn get_job_collection(&self) -> Collection<JobItem> {
        self.database.collection(JOBS_COLLECTION)
    }

    async fn ensure_indexes(&self) -> Result<(), DatabaseError> {
        let claim_index = IndexModel::builder()
            .keys(doc! { "wallet": 1, "quest_id": 1 })
            .options(IndexOptions::builder().unique(true).name(CLAIM_INDEX_NAME.to_string()).build())
            .build();
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.get_job_collection().create_indexes([claim_index, id_index], None).await?;
        Ok(())
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<JobItem>, DatabaseError> {
        let options = FindOptions::builder().sort(doc! { "created_at": 1, "_id": 1 }).build();
        let cursor = self.get_job_collection().find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn existing_claim(&self, job: &JobItem) -> Result<EnqueueOutcome, DatabaseError> {
        let existing = self.get_job_by_claim(job.wallet, &job.quest_id).await?.ok_or_else(|| {
            DatabaseError::PersistenceFailure(format!(
                "claim ({}, {}) reported as duplicate but not found",
                job.wallet, job.quest_id
            ))
        })?;
        debug!(job_id = %existing.id, status = %existing.status, "Job already exists for claim, skipping");
        Ok(EnqueueOutcome::Duplicate(existing.id))
    }
}

#[async_trait]
impl JobStore for MongoJobStore {
    async fn enqueue(&self, job: JobItem) -> Result<EnqueueOutcome, DatabaseError> {
        let start = Instant::now();
        let options = UpdateOptions::builder().upsert(true).build();

        let filter = claim_filter(&job.wallet, &job.quest_id);
        let updates = doc! {
            // only set when the document is inserted for the first time
            "$setOnInsert": job.to_document()?
        };

        match self.get_job_collection().update_one(filter, updates, options).await {
            Ok(result) if result.matched_count == 0 => {
                debug!(job_id = %job.id, duration = %start.elapsed().as_millis(), "Job created in MongoDB successfully");
                Ok(EnqueueOutcome::Created(job.id))
            }
            Ok(_) => self.existing_claim(&job).await,
            // Two concurrent upserts for the same claim: the loser hits the unique index.
            Err(e) if is_duplicate_key(&e) => self.existing_claim(&job).await,
            Err(e) => Err(e.into()),
        }
    }

    async fn list_pending(&self) -> Result<Vec<JobItem>, DatabaseError> {
        self.find_many(doc! { "status": bson::to_bson(&JobStatus::Pending)? }).await
    }

    async fn update_status(&self, id: Uuid, update: JobItemUpdates) -> Result<JobItem, DatabaseError> {
        let update = update.build()?;
        if let Some(status) = update.status {
            if !status.is_terminal() {
                return Err(DatabaseError::NoUpdateFound(format!("job {} can only move to success or failed", id)));
            }
        }

        // Only a pending job may change; the filter makes the transition check atomic.
        let filter = doc! {
            "id": id.to_string(),
            "status": bson::to_bson(&JobStatus::Pending)?,
        };
        let options = FindOneAndUpdateOptions::builder().upsert(false).return_document(ReturnDocument::After).build();

        // remove null values from the updates
        let mut non_null_updates = Document::new();
        for (k, v) in update.to_document()? {
            if v != Bson::Null {
                non_null_updates.insert(k, v);
            }
        }

        let result =
            self.get_job_collection().find_one_and_update(filter, doc! { "$set": non_null_updates }, options).await?;
        match result {
            Some(job) => {
                debug!(job_id = %id, status = %job.status, "Job updated successfully");
                Ok(job)
            }
            None => match self.get_job_by_id(id).await? {
                Some(job) => {
                    check_transition(&job, &update)?;
                    Err(DatabaseError::PersistenceFailure(format!("job {} changed while being updated", id)))
                }
                None => {
                    warn!(job_id = %id, "Update requested for unknown job");
                    Err(DatabaseError::JobNotFound(id))
                }
            },
        }
    }

    async fn get_job_by_id(&self, id: Uuid) -> Result<Option<JobItem>, DatabaseError> {
        let filter = doc! {
            "id": id.to_string()
        };
        Ok(self.get_job_collection().find_one(filter, None).await?)
    }

    async fn get_job_by_claim(&self, wallet: Address, quest_id: &str) -> Result<Option<JobItem>, DatabaseError> {
        Ok(self.get_job_collection().find_one(claim_filter(&wallet, quest_id), None).await?)
    }

    async fn list_jobs(&self) -> Result<Vec<JobItem>, DatabaseError> {
        self.find_many(doc! {}).await
    }
}
