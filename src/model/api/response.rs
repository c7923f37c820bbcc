use serde::{Deserialize, Serialize};

use crate::model::common::Rejection;

/// Discriminator telling the client how to interpret a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseStatus {
    Ok,
    #[serde(rename = "notFromLajazz")]
    NotEligible,
    #[serde(rename = "passwordWrong")]
    WrongCredential,
    AlreadyVoted,
    Unauthorized,
    Error,
}

impl From<Rejection> for ResponseStatus {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::NotEligible => Self::NotEligible,
            Rejection::WrongCredential => Self::WrongCredential,
            Rejection::AlreadyVoted => Self::AlreadyVoted,
        }
    }
}

/// The envelope every endpoint responds with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self::new(ResponseStatus::Ok, data)
    }

    pub fn new(status: ResponseStatus, data: T) -> Self {
        Self {
            status,
            data,
            token: None,
        }
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }
}

/// A plain message response.
pub type Message = ApiResponse<String>;

impl Message {
    pub fn message(status: ResponseStatus, data: impl Into<String>) -> Self {
        Self::new(status, data.into())
    }
}

impl From<Rejection> for Message {
    fn from(rejection: Rejection) -> Self {
        Self::message(rejection.into(), rejection.message())
    }
}
