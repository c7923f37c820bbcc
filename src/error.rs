use jsonwebtoken::errors::Error as JwtError;
use log::{error, warn};
use mongodb::error::Error as DbError;
use rocket::{
    http::{Status, StatusClass},
    response::Responder,
    Request,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Jwt(#[from] JwtError),
    #[error("{1}")]
    Status(Status, String),
}

impl Error {
    /// Shorthand for a 404 naming the missing thing.
    pub fn not_found(what: String) -> Self {
        Self::Status(Status::NotFound, format!("{what} not found"))
    }

    /// The HTTP status this error is reported with.
    pub fn status(&self) -> Status {
        match self {
            Self::Db(_) => Status::InternalServerError,
            Self::Jwt(_) => Status::Unauthorized,
            Self::Status(status, _) => *status,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        let route = req.uri();
        match status.class() {
            StatusClass::ServerError => error!("{route}: {self}"),
            _ => warn!("{route}: {self}"),
        }
        ErrorMessage::stash(req, &self);
        Err(status)
    }
}

/// The reason a request failed, kept in the request-local cache so the
/// catchers can report it.
pub struct ErrorMessage(Option<String>);

impl ErrorMessage {
    /// Remember why this request failed. Only the first reason is kept.
    pub fn stash(req: &Request<'_>, err: &Error) {
        // Database internals stay in the server logs.
        let message = match err {
            Error::Db(_) => "Database error".to_string(),
            _ => err.to_string(),
        };
        req.local_cache(|| ErrorMessage(Some(message)));
    }

    /// The reason this request failed, falling back to the status's description.
    pub fn of(req: &Request<'_>, status: Status) -> String {
        req.local_cache(|| ErrorMessage(None))
            .0
            .clone()
            .unwrap_or_else(|| status.reason().unwrap_or("Unknown error").to_string())
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::errors::ErrorKind;

    use super::*;

    #[test]
    fn status_mapping() {
        let jwt: Error = JwtError::from(ErrorKind::ExpiredSignature).into();
        assert_eq!(jwt.status(), Status::Unauthorized);

        let custom = Error::Status(Status::BadRequest, "Duplicate selection".to_string());
        assert_eq!(custom.status(), Status::BadRequest);
        assert_eq!(custom.to_string(), "Duplicate selection");

        let missing = Error::not_found("Candidate 111111111".to_string());
        assert_eq!(missing.status(), Status::NotFound);
        assert_eq!(missing.to_string(), "Candidate 111111111 not found");
    }
}
