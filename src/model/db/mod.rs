pub mod candidate;
pub mod student;
pub mod vote;

pub use candidate::Candidate;
pub use student::Student;
pub use vote::{record_votes, Submission, Vote};
