use serde::{Deserialize, Serialize};

/// Body of a student verification request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRequest {
    #[serde(rename = "studentData")]
    pub student_data: StudentCredentials,
}

/// The credentials a student signs in with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentCredentials {
    #[serde(rename = "studNumber")]
    pub stud_number: String,
    pub pin: String,
}

#[cfg(test)]
mod examples {
    use super::*;
    use crate::model::db::Student;

    impl StudentRequest {
        /// Credentials matching [`Student::example`].
        pub fn example() -> Self {
            Self::new(&Student::example().student_number, &Student::example().pin)
        }

        pub fn new(stud_number: &str, pin: &str) -> Self {
            Self {
                student_data: StudentCredentials {
                    stud_number: stud_number.to_string(),
                    pin: pin.to_string(),
                },
            }
        }
    }
}
