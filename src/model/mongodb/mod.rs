mod collection;
mod errors;
mod transaction;

pub use collection::{ensure_indexes_exist, Coll, MongoCollection};
pub use errors::{duplicate_key_count, is_duplicate_key_error, DUPLICATE_KEY};
pub use transaction::{is_transient, is_unknown_commit_result, MAX_TRANSACTION_ATTEMPTS};
