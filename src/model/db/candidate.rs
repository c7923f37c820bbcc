use serde::{Deserialize, Serialize};

/// A candidate standing in the election, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "_id")]
    pub student_number: String,
    /// Short code derived from the student number.
    pub pin: String,
    /// Filename of the candidate's photo, served under `/candidate_photos`.
    pub photo: String,
    pub names: String,
}

impl Candidate {
    pub fn new(student_number: String, photo: String, names: String) -> Self {
        let pin = derive_pin(&student_number);
        Self {
            student_number,
            pin,
            photo,
            names,
        }
    }
}

/// A candidate's code is everything after the sixth character of their
/// student number, i.e. the last three characters of a well-formed number.
pub fn derive_pin(student_number: &str) -> String {
    student_number.chars().skip(6).collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_is_derived_from_number() {
        assert_eq!(Candidate::example().pin, "001");
        assert_eq!(derive_pin("123456789"), "789");
        assert_eq!(derive_pin("12345"), "");
    }
}
