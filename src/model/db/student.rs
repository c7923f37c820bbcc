use serde::{Deserialize, Serialize};

/// An eligible student, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// The student number doubles as the document ID.
    #[serde(rename = "_id")]
    pub student_number: String,
    /// The student's PIN. Compared ignoring surrounding whitespace.
    pub pin: String,
    /// Set once the student's votes have been recorded.
    #[serde(default)]
    pub has_voted: bool,
}

impl Student {
    /// Create a student who has not yet voted.
    pub fn new(student_number: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            student_number: student_number.into(),
            pin: pin.into(),
            has_voted: false,
        }
    }

    /// Check whether the given PIN is correct.
    pub fn verify_pin(&self, pin: &str) -> bool {
        self.pin.trim() == pin.trim()
    }
}

/// Is this a well-formed student number?
pub fn is_valid_student_number(number: &str) -> bool {
    number.len() == STUDENT_NUMBER_LENGTH && number.chars().all(|c| c.is_ascii_alphanumeric())
}

pub const STUDENT_NUMBER_LENGTH: usize = 9;
pub const PIN_LENGTH: usize = 3;
