use log::info;
use mongodb::Client as DbClient;
use rocket::{http::Status, serde::json::Json, Route, State};

use crate::error::{Error, Result};
use crate::model::{
    api::{
        auth::AuthToken,
        response::{Message, ResponseStatus},
        vote::PlaceVotesRequest,
    },
    db::{record_votes, Candidate, Student, Submission, Vote},
    mongodb::Coll,
};

pub fn routes() -> Vec<Route> {
    routes![place_votes]
}

#[post("/placeVotes", data = "<request>", format = "json")]
async fn place_votes(
    token: AuthToken,
    request: Json<PlaceVotesRequest>,
    students: Coll<Student>,
    candidates: Coll<Candidate>,
    votes: Coll<Vote>,
    db_client: &State<DbClient>,
) -> Result<Json<Message>> {
    if let Some(repeated) = request.repeated_candidate() {
        return Err(Error::Status(
            Status::BadRequest,
            format!("Candidate {repeated} selected more than once"),
        ));
    }

    let student_number = token.student_number();
    let submission = record_votes(
        db_client,
        &students,
        &candidates,
        &votes,
        student_number,
        &request.student_vote,
    )
    .await?;

    match submission {
        Submission::Recorded(count) => {
            info!("Recorded {count} votes from student {student_number}");
            Ok(Json(Message::message(
                ResponseStatus::Ok,
                "Student vote placed",
            )))
        }
        Submission::Rejected(rejection) => Ok(Json(rejection.into())),
    }
}
