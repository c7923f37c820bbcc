use log::{debug, warn};
use mongodb::{bson::doc, Client, ClientSession};
use rocket::tokio::time::{sleep, Duration};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    api::vote::VoteSelection,
    common::Rejection,
    db::{candidate::Candidate, student::Student},
    mongodb::{
        is_duplicate_key_error, is_transient, is_unknown_commit_result, Coll,
        MAX_TRANSACTION_ATTEMPTS,
    },
};

/// Base delay between attempts at a conflicting transaction, scaled by the attempt number.
const TRANSACTION_BACKOFF: Duration = Duration::from_millis(20);

/// A single entry in the vote ledger.
///
/// Entries are only ever inserted, never modified or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// The voter.
    pub student_number: String,
    /// The value the voter gave this candidate. Stored as-is.
    pub vote: i32,
    /// The candidate voted for.
    pub candidate_number: String,
}

impl Vote {
    pub fn new(student_number: &str, selection: &VoteSelection) -> Self {
        Self {
            student_number: student_number.to_string(),
            vote: selection.votes,
            candidate_number: selection.candidate_number.clone(),
        }
    }

    /// Does the ledger hold any entry for this student?
    pub async fn any_for_student(votes: &Coll<Vote>, student_number: &str) -> Result<bool> {
        let count = votes
            .count_documents(doc! { "student_number": student_number }, None)
            .await?;
        Ok(count > 0)
    }
}

/// The result of a vote submission that did not hit an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The given number of ledger entries were written.
    Recorded(usize),
    /// Nothing was written.
    Rejected(Rejection),
}

/// Record a student's selections and mark them as having voted.
///
/// Everything happens inside one transaction, which only proceeds if it is
/// the one to flip the student's `has_voted` flag. Concurrent submissions for
/// the same student therefore cannot both succeed: the loser either conflicts
/// and is retried, or sees the flag already set, and is rejected.
pub async fn record_votes(
    db_client: &Client,
    students: &Coll<Student>,
    candidates: &Coll<Candidate>,
    votes: &Coll<Vote>,
    student_number: &str,
    selections: &[VoteSelection],
) -> Result<Submission> {
    let ballot: Vec<Vote> = selections
        .iter()
        .map(|selection| Vote::new(student_number, selection))
        .collect();

    let mut session = db_client.start_session(None).await?;
    let mut attempt = 1;
    loop {
        session.start_transaction(None).await?;
        let result =
            match record_in_session(&mut session, students, candidates, votes, student_number, &ballot)
                .await
            {
                Ok(Submission::Recorded(count)) => commit(&mut session)
                    .await
                    .map(|_| Submission::Recorded(count)),
                Ok(rejected) => {
                    session.abort_transaction().await?;
                    return Ok(rejected);
                }
                Err(e) => {
                    // The server may already have aborted; nothing to report either way.
                    let _ = session.abort_transaction().await;
                    Err(e)
                }
            };

        match result {
            Err(e) if is_transient(&e) && attempt < MAX_TRANSACTION_ATTEMPTS => {
                warn!("Vote transaction for {student_number} failed transiently (attempt {attempt}): {e}");
                sleep(TRANSACTION_BACKOFF * attempt as u32).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}

/// The body of the vote transaction.
async fn record_in_session(
    session: &mut ClientSession,
    students: &Coll<Student>,
    candidates: &Coll<Candidate>,
    votes: &Coll<Vote>,
    student_number: &str,
    ballot: &[Vote],
) -> Result<Submission> {
    // Claim the student. This write is what serializes concurrent submissions.
    let filter = doc! {
        "_id": student_number,
        // Records without the flag have not voted.
        "has_voted": { "$ne": true },
    };
    let update = doc! {
        "$set": {
            "has_voted": true,
        }
    };
    let result = students
        .update_one_with_session(filter, update, None, session)
        .await?;
    if result.matched_count == 0 {
        let exists = students
            .find_one_with_session(doc! { "_id": student_number }, None, session)
            .await?
            .is_some();
        let rejection = if exists {
            Rejection::AlreadyVoted
        } else {
            Rejection::NotEligible
        };
        debug!("Rejected votes from {student_number}: {rejection}");
        return Ok(Submission::Rejected(rejection));
    }

    if ballot.is_empty() {
        return Ok(Submission::Recorded(0));
    }

    // Ensure every candidate exists.
    let wanted: Vec<String> = ballot
        .iter()
        .map(|vote| vote.candidate_number.clone())
        .collect();
    let found = candidates
        .distinct_with_session("_id", doc! { "_id": { "$in": wanted.clone() } }, None, session)
        .await?;
    let missing: Vec<&str> = wanted
        .iter()
        .map(String::as_str)
        .filter(|number| !found.iter().any(|id| id.as_str() == Some(*number)))
        .collect();
    if !missing.is_empty() {
        return Err(Error::not_found(format!("Candidate {}", missing.join(", "))));
    }

    // Append to the ledger.
    let inserted = votes
        .insert_many_with_session(ballot.iter(), None, session)
        .await;
    if is_duplicate_key_error(inserted.as_ref()) {
        // Ledger entries without the flag set; treat the student as having voted.
        warn!("Found existing ledger entries for {student_number} despite unset flag");
        return Ok(Submission::Rejected(Rejection::AlreadyVoted));
    }
    let count = inserted?.inserted_ids.len();

    Ok(Submission::Recorded(count))
}

/// Commit the current transaction, retrying while the outcome is unknown.
async fn commit(session: &mut ClientSession) -> Result<()> {
    let mut attempt = 1;
    loop {
        match session.commit_transaction().await {
            Err(e) if is_unknown_commit_result(&e) && attempt < MAX_TRANSACTION_ATTEMPTS => {
                warn!("Unknown commit result (attempt {attempt}), retrying commit: {e}");
                attempt += 1;
            }
            other => return other.map_err(Error::from),
        }
    }
}
