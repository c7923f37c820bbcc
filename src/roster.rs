//! Loading the electoral roll (students and candidates) into the database.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::{debug, info};
use mongodb::{error::Error as DbError, options::InsertManyOptions, Database};
use rocket::serde::json::serde_json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    db::{
        candidate::Candidate,
        student::{is_valid_student_number, Student, PIN_LENGTH},
    },
    mongodb::{duplicate_key_count, Coll, MongoCollection},
};

/// Errors that can occur while loading a roster.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Failed to read roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid roster JSON: {0}")]
    Format(#[from] serde_json::Error),
    #[error("Invalid student number {0:?}: expected 9 letters or digits")]
    StudentNumber(String),
    #[error("Invalid PIN for student {0}: expected 3 characters")]
    Pin(String),
    #[error("Student number {0} appears more than once")]
    Duplicate(String),
    #[error(transparent)]
    Db(#[from] DbError),
}

/// A student entry in the roster file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentEntry {
    pub student_number: String,
    pub pin: String,
}

/// A candidate entry in the roster file. Their PIN is derived, not given.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateEntry {
    pub student_number: String,
    pub photo: String,
    pub names: String,
}

/// Everyone taking part in the election.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub students: Vec<StudentEntry>,
    #[serde(default)]
    pub candidates: Vec<CandidateEntry>,
}

impl Roster {
    /// Read and validate a roster from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let file = BufReader::new(File::open(path)?);
        let roster: Roster = serde_json::from_reader(file)?;
        roster.validate()?;
        Ok(roster)
    }

    /// Check every entry is well-formed and no student number is listed twice
    /// in the same section.
    pub fn validate(&self) -> Result<(), RosterError> {
        let mut seen = HashSet::new();
        for student in &self.students {
            check_number(&student.student_number, &mut seen)?;
            if student.pin.trim().chars().count() != PIN_LENGTH {
                return Err(RosterError::Pin(student.student_number.clone()));
            }
        }

        seen.clear();
        for candidate in &self.candidates {
            check_number(&candidate.student_number, &mut seen)?;
        }
        Ok(())
    }

    /// Convert the entries into database records.
    pub fn records(&self) -> (Vec<Student>, Vec<Candidate>) {
        let students = self
            .students
            .iter()
            .map(|entry| Student::new(entry.student_number.as_str(), entry.pin.trim()))
            .collect();
        let candidates = self
            .candidates
            .iter()
            .map(|entry| {
                Candidate::new(
                    entry.student_number.clone(),
                    entry.photo.clone(),
                    entry.names.clone(),
                )
            })
            .collect();
        (students, candidates)
    }
}

fn check_number<'a>(
    number: &'a str,
    seen: &mut HashSet<&'a str>,
) -> Result<(), RosterError> {
    if !is_valid_student_number(number) {
        return Err(RosterError::StudentNumber(number.to_string()));
    }
    if !seen.insert(number) {
        return Err(RosterError::Duplicate(number.to_string()));
    }
    Ok(())
}

/// How many records a seeding run added, and how many were already present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub students_inserted: usize,
    pub students_existing: usize,
    pub candidates_inserted: usize,
    pub candidates_existing: usize,
}

impl Display for SeedReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} new students ({} already registered), {} new candidates ({} already registered)",
            self.students_inserted,
            self.students_existing,
            self.candidates_inserted,
            self.candidates_existing
        )
    }
}

/// Insert every student and candidate in the roster that is not already in
/// the database. Existing records are left untouched, so this is idempotent.
pub async fn seed_roster(db: &Database, roster: &Roster) -> Result<SeedReport, RosterError> {
    let (students, candidates) = roster.records();
    let (students_inserted, students_existing) =
        insert_missing(&Coll::<Student>::from_db(db), students).await?;
    let (candidates_inserted, candidates_existing) =
        insert_missing(&Coll::<Candidate>::from_db(db), candidates).await?;

    let report = SeedReport {
        students_inserted,
        students_existing,
        candidates_inserted,
        candidates_existing,
    };
    info!("Roster seeded: {report}");
    Ok(report)
}

/// Insert all the records, skipping those whose ID already exists.
/// Returns the number inserted and the number skipped.
async fn insert_missing<T>(coll: &Coll<T>, records: Vec<T>) -> Result<(usize, usize), DbError>
where
    T: MongoCollection + Serialize + Send + Sync,
{
    let total = records.len();
    if total == 0 {
        return Ok((0, 0));
    }

    // Keep going past duplicates rather than stopping at the first.
    let options = InsertManyOptions::builder().ordered(false).build();
    match coll.insert_many(records, options).await {
        Ok(result) => Ok((result.inserted_ids.len(), 0)),
        Err(e) => match duplicate_key_count(&e) {
            Some(existing) => {
                debug!("Skipped {existing} existing records in {}", T::NAME);
                Ok((total - existing, existing))
            }
            None => Err(e),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use mongodb::bson::doc;

    use super::*;

    const ROSTER_JSON: &str = r#"{
        "students": [
            {"studentNumber": "123456789", "pin": "123"},
            {"studentNumber": "987654321", "pin": " abc "}
        ],
        "candidates": [
            {"studentNumber": "201900001", "photo": "thandi.jpg", "names": "Thandi Mokoena"}
        ]
    }"#;

    fn roster() -> Roster {
        serde_json::from_str(ROSTER_JSON).unwrap()
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ROSTER_JSON.as_bytes()).unwrap();

        let roster = Roster::load(file.path()).unwrap();
        assert_eq!(roster.students.len(), 2);
        assert_eq!(roster.candidates.len(), 1);
    }

    #[test]
    fn load_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"students\": [").unwrap();
        assert!(matches!(
            Roster::load(file.path()),
            Err(RosterError::Format(_))
        ));
        assert!(matches!(
            Roster::load("no such roster.json"),
            Err(RosterError::Io(_))
        ));
    }

    #[test]
    fn records_trim_pins_and_derive_candidate_pins() {
        let (students, candidates) = roster().records();
        assert_eq!(students[1], Student::new("987654321", "abc"));
        assert_eq!(candidates[0], Candidate::example());
    }

    #[test]
    fn validation() {
        assert!(roster().validate().is_ok());

        let mut bad_number = roster();
        bad_number.students[0].student_number = "12345".to_string();
        assert!(matches!(
            bad_number.validate(),
            Err(RosterError::StudentNumber(n)) if n == "12345"
        ));

        let mut bad_pin = roster();
        bad_pin.students[0].pin = "1234".to_string();
        assert!(matches!(bad_pin.validate(), Err(RosterError::Pin(_))));

        let mut duplicate = roster();
        duplicate.students.push(duplicate.students[0].clone());
        assert!(matches!(
            duplicate.validate(),
            Err(RosterError::Duplicate(n)) if n == "123456789"
        ));

        // A candidate may also be on the student roll.
        let mut candidate_student = roster();
        candidate_student.candidates[0].student_number = "123456789".to_string();
        assert!(candidate_student.validate().is_ok());
    }

    #[backend_test]
    async fn seeding_is_idempotent(db: Database, students: Coll<Student>) {
        let first = seed_roster(&db, &roster()).await.unwrap();
        assert_eq!(
            first,
            SeedReport {
                students_inserted: 2,
                students_existing: 0,
                candidates_inserted: 1,
                candidates_existing: 0,
            }
        );

        // A student who has voted keeps their flag when the roster is reloaded.
        students
            .update_one(
                doc! { "_id": "123456789" },
                doc! { "$set": { "has_voted": true } },
                None,
            )
            .await
            .unwrap();

        let second = seed_roster(&db, &roster()).await.unwrap();
        assert_eq!(
            second,
            SeedReport {
                students_inserted: 0,
                students_existing: 2,
                candidates_inserted: 0,
                candidates_existing: 1,
            }
        );
        let student = students
            .find_one(doc! { "_id": "123456789" }, None)
            .await
            .unwrap()
            .unwrap();
        assert!(student.has_voted);
        assert_eq!(students.count_documents(None, None).await.unwrap(), 2);
    }
}
