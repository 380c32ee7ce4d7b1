pub mod database;
pub mod ledger;
pub mod service;

pub use database::{DatabaseParams, MongoDbParams};
pub use service::{ServerParams, ServiceParams};
