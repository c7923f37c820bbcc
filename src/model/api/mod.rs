pub mod auth;
pub mod candidate;
pub mod response;
pub mod vote;
