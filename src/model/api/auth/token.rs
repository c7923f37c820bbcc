use chrono::{serde::ts_seconds, DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use log::warn;
use rocket::{
    http::{Cookie, SameSite, Status},
    request::{FromRequest, Outcome},
    time::Duration,
    Request, State,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, ErrorMessage};
use crate::model::db::Student;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Private cookie recording which student last signed in from this browser.
pub const SESSION_COOKIE: &str = "student_session";

/// An authentication token for a student who has passed the eligibility checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    #[serde(rename = "studentnumber")]
    student_number: String,
}

impl AuthToken {
    /// Create a new [`AuthToken`] for the given student.
    pub fn new(student: &Student) -> Self {
        Self {
            student_number: student.student_number.clone(),
        }
    }

    /// The student this token was issued to.
    pub fn student_number(&self) -> &str {
        &self.student_number
    }

    /// Serialize this token into a signed JWT, valid for the configured lifetime.
    pub fn encode(self, config: &Config) -> String {
        let expire_at = Utc::now() + config.auth_ttl();
        self.encode_until(expire_at, config)
    }

    #[allow(clippy::missing_panics_doc)]
    fn encode_until(self, expire_at: DateTime<Utc>, config: &Config) -> String {
        let claims = Claims {
            token: self,
            issued_at: Utc::now(),
            expire_at,
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
        .expect("JWT encoding is infallible with default settings")
    }

    /// Deserialize a token from a signed JWT, checking its signature and expiry.
    pub fn decode(jwt: &str, config: &Config) -> Result<Self, Error> {
        let token = jsonwebtoken::decode(
            jwt,
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::default(),
        )
        .map(|claims: TokenData<Claims>| claims.claims.token)?;
        Ok(token)
    }

    /// Deserialize a token from the value of an `Authorization` header.
    pub fn from_header(header: &str, config: &Config) -> Result<Self, Error> {
        let jwt = header.strip_prefix(BEARER_PREFIX).ok_or_else(|| {
            Error::Status(
                Status::Unauthorized,
                "Authorization header is not a bearer token".to_string(),
            )
        })?;
        Self::decode(jwt.trim(), config)
    }

    /// Build the session cookie recording this student's sign-in.
    pub fn session_cookie(&self, config: &Config) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, self.student_number.clone())
            .max_age(Duration::seconds(config.session_ttl().num_seconds()))
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish()
    }
}

/// Token claims: the token itself plus issue and expiry datetimes.
#[derive(Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    token: AuthToken,
    #[serde(rename = "iat", with = "ts_seconds")]
    issued_at: DateTime<Utc>,
    #[serde(rename = "exp", with = "ts_seconds")]
    expire_at: DateTime<Utc>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthToken {
    type Error = Error;

    /// Get an [`AuthToken`] from the `Authorization` header.
    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        // Unwrap is safe as `Config` is always managed.
        let config = req.guard::<&State<Config>>().await.unwrap();

        let token = match req.headers().get_one("Authorization") {
            Some(header) => Self::from_header(header, config),
            None => Err(Error::Status(
                Status::Unauthorized,
                "Missing bearer token".to_string(),
            )),
        };

        match token {
            Ok(token) => Outcome::Success(token),
            Err(e) => {
                warn!("Rejected authorization for {}: {e}", req.uri());
                ErrorMessage::stash(req, &e);
                Outcome::Failure((Status::Unauthorized, e))
            }
        }
    }
}
