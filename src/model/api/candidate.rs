use serde::{Deserialize, Serialize};

use crate::model::db::candidate::Candidate;

/// A candidate as presented to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDescription {
    #[serde(rename = "studentnumber")]
    pub student_number: String,
    pub pin: String,
    pub photo: String,
    pub names: String,
}

impl From<Candidate> for CandidateDescription {
    fn from(candidate: Candidate) -> Self {
        Self {
            student_number: candidate.student_number,
            pin: candidate.pin,
            photo: candidate.photo,
            names: candidate.names,
        }
    }
}
