pub mod database;

pub use database::file::FileJobStore;
pub use database::mongodb::MongoJobStore;
pub use database::{DatabaseError, JobStore};
