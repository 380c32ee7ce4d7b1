use mongodb::bson;
use thiserror::Error;
use uuid::Uuid;

use crate::types::jobs::JobStatus;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Job not found: {0}")]
    JobNotFound(Uuid),

    #[error("Job {id} is already {status}, terminal jobs cannot change status")]
    InvalidStatusTransition { id: Uuid, status: JobStatus },

    #[error("No update found: {0}")]
    NoUpdateFound(String),

    #[error("Failed to serialize document: {0}")]
    FailedToSerializeDocument(String),

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Job collection is unreadable: {0}")]
    CorruptCollection(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Mongo error: {0}")]
    MongoError(#[from] mongodb::error::Error),

    #[error("Bson serialization error: {0}")]
    BsonSerializationError(#[from] bson::ser::Error),
}

impl DatabaseError {
    /// Storage could not be read or written, as opposed to a rejected operation.
    pub fn is_persistence_failure(&self) -> bool {
        matches!(
            self,
            DatabaseError::PersistenceFailure(_)
                | DatabaseError::CorruptCollection(_)
                | DatabaseError::IoError(_)
                | DatabaseError::MongoError(_)
                | DatabaseError::BsonSerializationError(_)
                | DatabaseError::FailedToSerializeDocument(_)
        )
    }
}
