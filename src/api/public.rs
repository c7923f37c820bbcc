use log::debug;
use mongodb::{bson::doc, options::FindOptions};
use rocket::{futures::TryStreamExt, serde::json::Json, Route};

use crate::error::Result;
use crate::model::{
    api::{
        candidate::CandidateDescription,
        response::{ApiResponse, Message, ResponseStatus},
    },
    db::Candidate,
    mongodb::Coll,
};

pub fn routes() -> Vec<Route> {
    routes![health, get_candidates]
}

#[get("/")]
fn health() -> Json<Message> {
    Json(Message::message(ResponseStatus::Ok, "Server is up"))
}

#[get("/getCandidates")]
async fn get_candidates(
    candidates: Coll<Candidate>,
) -> Result<Json<ApiResponse<Vec<CandidateDescription>>>> {
    let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
    let candidate_list: Vec<Candidate> = candidates
        .find(None, options)
        .await?
        .try_collect()
        .await?;
    debug!("Found {} candidates", candidate_list.len());

    let descriptions = candidate_list.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::ok(descriptions)))
}
