pub mod rejection;

pub use rejection::Rejection;
