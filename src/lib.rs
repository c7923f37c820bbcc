#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

use crate::{
    config::{CandidatePhotosFairing, ConfigFairing, DatabaseFairing},
    logging::LoggerFairing,
};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod roster;

pub use config::Config;

/// Build a rocket from the default figment (`Rocket.toml` + `ROCKET_*` env vars).
pub fn build() -> Rocket<Build> {
    assemble(rocket::build())
}

/// Attach everything the server needs to the given rocket.
fn assemble(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .attach(LoggerFairing)
        .attach(ConfigFairing)
        .attach(DatabaseFairing)
        .attach(CandidatePhotosFairing)
        .mount("/", api::routes())
        .register("/", api::catchers())
}

/// Key used to sign tokens in tests. Never used outside of test builds.
#[cfg(test)]
pub(crate) const TEST_JWT_SECRET: &str = "test-only jwt secret";

/// Build a rocket for tests: the normal config plus a signing key, with Rocket itself kept quiet.
#[cfg(test)]
pub(crate) fn rocket_for_tests() -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("jwt_secret", TEST_JWT_SECRET))
        .merge(("log_level", "off"));
    assemble(rocket::custom(figment))
}
