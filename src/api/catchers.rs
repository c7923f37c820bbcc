use rocket::{http::Status, serde::json::Json, Catcher, Request};

use crate::error::ErrorMessage;
use crate::model::api::response::{Message, ResponseStatus};

pub fn catchers() -> Vec<Catcher> {
    catchers![unauthorized, default]
}

#[catch(401)]
fn unauthorized(req: &Request) -> Json<Message> {
    let reason = ErrorMessage::of(req, Status::Unauthorized);
    Json(Message::message(ResponseStatus::Unauthorized, reason))
}

#[catch(default)]
fn default(status: Status, req: &Request) -> Json<Message> {
    let reason = ErrorMessage::of(req, status);
    Json(Message::message(ResponseStatus::Error, reason))
}
