use std::fmt::{Display, Formatter};

/// Reasons a student may be turned away from voting.
///
/// These are expected outcomes rather than failures, so they are reported to
/// the client as ordinary responses carrying a status discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No student with the given number is on the roll.
    NotEligible,
    /// The PIN did not match.
    WrongCredential,
    /// The student's votes have already been recorded.
    AlreadyVoted,
}

impl Rejection {
    /// The message shown to the student.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotEligible => "Only Students From La-Jazz Can Participate in the Elections",
            Self::WrongCredential => "Wrong Pin",
            Self::AlreadyVoted => "You've already voted though we appreciate your dedication",
        }
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NotEligible => "not eligible",
            Self::WrongCredential => "wrong credential",
            Self::AlreadyVoted => "already voted",
        };
        write!(f, "{name}")
    }
}
