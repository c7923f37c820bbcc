mod request;
mod token;

pub use request::{StudentCredentials, StudentRequest};
pub use token::{AuthToken, BEARER_PREFIX, SESSION_COOKIE};
