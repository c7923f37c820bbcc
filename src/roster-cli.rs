//! A simple CLI tool for checking a roster file and loading it into the election database.
//! This uses the same loading code as the server, so anything it accepts the server will too.

use clap::{Arg, ArgAction, ArgMatches, Command};
use mongodb::Client as MongoClient;

use student_election_backend::roster::{seed_roster, Roster, RosterError, SeedReport};

const PROGRAM_NAME: &str = "roster-cli";

const ABOUT_TEXT: &str = "Validate an election roster, and optionally load it into the database.

EXIT CODES:
     0: The roster is valid (and was loaded, if requested).
     1: Error.";

const ROSTER_PATH: &str = "ROSTER_PATH";
const DB_URI: &str = "db-uri";
const DATABASE: &str = "database";

const ROSTER_PATH_HELP: &str = "The path to a JSON roster, containing\n\
`students` (studentNumber, pin) and `candidates` (studentNumber, photo, names)";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .arg(
            Arg::new(ROSTER_PATH)
                .help(ROSTER_PATH_HELP)
                .action(ArgAction::Set)
                .required(true),
        )
        .arg(
            Arg::new(DB_URI)
                .long(DB_URI)
                .help("MongoDB connection string; if given, the roster is loaded into the database")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new(DATABASE)
                .long(DATABASE)
                .help("Name of the election database")
                .action(ArgAction::Set)
                .default_value("student_election"),
        )
}

/// Connect to the database and insert whatever is missing.
fn seed(roster: &Roster, db_uri: &str, db_name: &str) -> Result<SeedReport, RosterError> {
    let runtime = rocket::tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let client = MongoClient::with_uri_str(db_uri).await?;
        seed_roster(&client.database(db_name), roster).await
    })
}

/// Validate the roster, seed it if asked, report the result, and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    let path: &String = args.get_one(ROSTER_PATH).unwrap(); // Required argument is guaranteed to be present.
    let roster = match Roster::load(path) {
        Ok(roster) => roster,
        Err(e) => {
            println!("{e}");
            return 1;
        }
    };
    println!(
        "Roster is valid: {} students, {} candidates.",
        roster.students.len(),
        roster.candidates.len()
    );

    let Some(db_uri) = args.get_one::<String>(DB_URI) else {
        return 0;
    };
    let db_name: &String = args.get_one(DATABASE).unwrap(); // Has a default.
    match seed(&roster, db_uri, db_name) {
        Ok(report) => {
            println!("Loaded into {db_name}: {report}.");
            0
        }
        Err(e) => {
            println!("Failed to load roster: {e}");
            1
        }
    }
}

fn main() {
    let args = cli().get_matches();
    let exit_code = run(&args);
    std::process::exit(exit_code.into())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn roster_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn correct_cli_usage() {
        let valid = roster_file(
            r#"{
                "students": [{"studentNumber": "123456789", "pin": "123"}],
                "candidates": [{"studentNumber": "201900001", "photo": "a.jpg", "names": "A B"}]
            }"#,
        );
        let path = valid.path().to_str().unwrap();
        let args = cli().try_get_matches_from([PROGRAM_NAME, path]).unwrap();
        assert_eq!(run(&args), 0);

        let bad_pin = roster_file(r#"{"students": [{"studentNumber": "123456789", "pin": "12"}]}"#);
        let path = bad_pin.path().to_str().unwrap();
        let args = cli().try_get_matches_from([PROGRAM_NAME, path]).unwrap();
        assert_eq!(run(&args), 1);

        let malformed = roster_file("not json");
        let path = malformed.path().to_str().unwrap();
        let args = cli().try_get_matches_from([PROGRAM_NAME, path]).unwrap();
        assert_eq!(run(&args), 1);

        let args = cli()
            .try_get_matches_from([PROGRAM_NAME, "not a real file"])
            .unwrap();
        assert_eq!(run(&args), 1);
    }

    #[test]
    fn database_options() {
        let args = cli()
            .try_get_matches_from([
                PROGRAM_NAME,
                "roster.json",
                "--db-uri",
                "mongodb://localhost:27017",
            ])
            .unwrap();
        assert_eq!(
            args.get_one::<String>(DATABASE).map(String::as_str),
            Some("student_election")
        );

        let args = cli()
            .try_get_matches_from([PROGRAM_NAME, "roster.json", "--database", "mock_election"])
            .unwrap();
        assert_eq!(
            args.get_one::<String>(DATABASE).map(String::as_str),
            Some("mock_election")
        );
        assert!(args.get_one::<String>(DB_URI).is_none());
    }

    #[test]
    fn bad_cli_usage() {
        // Something very wrong.
        let command_line = [PROGRAM_NAME, "this", "invocation", "is", "incorrect"];
        cli().try_get_matches_from(command_line).unwrap_err();

        // No options at all.
        let command_line = [PROGRAM_NAME];
        cli().try_get_matches_from(command_line).unwrap_err();

        // Database URI given without a value.
        let command_line = [PROGRAM_NAME, "roster.json", "--db-uri"];
        cli().try_get_matches_from(command_line).unwrap_err();
    }
}
