use mongodb::error::{Error as DbError, TRANSIENT_TRANSACTION_ERROR, UNKNOWN_TRANSACTION_COMMIT_RESULT};

use crate::error::Error;

/// How many times a transaction is attempted before a transient failure is
/// reported to the caller.
pub const MAX_TRANSACTION_ATTEMPTS: usize = 5;

/// Did the transaction fail in a way that means it can be run again from the start?
///
/// Write conflicts between concurrent transactions land here.
pub fn is_transient(err: &Error) -> bool {
    match err {
        Error::Db(e) => e.contains_label(TRANSIENT_TRANSACTION_ERROR),
        _ => false,
    }
}

/// Did the commit fail without telling us whether it went through?
/// Committing again is safe in that case.
pub fn is_unknown_commit_result(err: &DbError) -> bool {
    err.contains_label(UNKNOWN_TRANSACTION_COMMIT_RESULT)
}
