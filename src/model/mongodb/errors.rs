//! For some reason, the mongodb crate doesn't provide error code constants.
//! This module fills in the gaps.

use mongodb::error::{Error as DbError, ErrorKind, WriteFailure};

pub const DUPLICATE_KEY: i32 = 11000;

/// Return true if the given result is a duplicate key write error.
pub fn is_duplicate_key_error<T>(result: Result<T, &DbError>) -> bool {
    if let Err(err) = result {
        if let ErrorKind::Write(WriteFailure::WriteError(ref e)) = *err.kind {
            return e.code == DUPLICATE_KEY;
        }
        if let ErrorKind::BulkWrite(ref failure) = *err.kind {
            return failure
                .write_errors
                .as_ref()
                .map_or(false, |errors| errors.iter().any(|e| e.code == DUPLICATE_KEY));
        }
    }
    false
}

/// If the given error consists solely of duplicate key failures, return how
/// many documents were rejected. Any other kind of failure yields `None`.
pub fn duplicate_key_count(err: &DbError) -> Option<usize> {
    match *err.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref e)) if e.code == DUPLICATE_KEY => Some(1),
        ErrorKind::BulkWrite(ref failure) if failure.write_concern_error.is_none() => {
            let errors = failure.write_errors.as_ref()?;
            errors
                .iter()
                .all(|e| e.code == DUPLICATE_KEY)
                .then(|| errors.len())
        }
        _ => None,
    }
}
