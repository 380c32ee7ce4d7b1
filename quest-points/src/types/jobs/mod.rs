pub mod job_item;
pub mod job_updates;
pub(crate) mod serde_helpers;
pub mod types;

pub use job_item::JobItem;
pub use job_updates::JobItemUpdates;
pub use types::{EnqueueOutcome, JobStatus};
