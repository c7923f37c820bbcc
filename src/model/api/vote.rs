use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Body of a vote submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceVotesRequest {
    #[serde(rename = "studentVote")]
    pub student_vote: Vec<VoteSelection>,
}

impl PlaceVotesRequest {
    /// Return the first candidate that appears more than once, if any.
    pub fn repeated_candidate(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.student_vote
            .iter()
            .map(|selection| selection.candidate_number.as_str())
            .find(|number| !seen.insert(*number))
    }
}

/// One selection on a student's ballot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSelection {
    /// The candidate's student number.
    #[serde(rename = "studentNumber")]
    pub candidate_number: String,
    pub votes: i32,
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl VoteSelection {
        pub fn example() -> Self {
            Self {
                candidate_number: "201900001".to_string(),
                votes: 1,
            }
        }

        pub fn example2() -> Self {
            Self {
                candidate_number: "201900002".to_string(),
                votes: 2,
            }
        }
    }

    impl PlaceVotesRequest {
        pub fn example() -> Self {
            Self {
                student_vote: vec![VoteSelection::example()],
            }
        }
    }
}
