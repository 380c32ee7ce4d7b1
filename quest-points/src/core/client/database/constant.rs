pub const JOBS_COLLECTION: &str = "jobs";

/// Unique index enforcing one job per `(wallet, quest_id)`.
pub const CLAIM_INDEX_NAME: &str = "wallet_quest_id_unique";

/// MongoDB server error code for a unique index violation.
pub const DUPLICATE_KEY_ERROR_CODE: i32 = 11000;
