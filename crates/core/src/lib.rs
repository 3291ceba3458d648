pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

pub use errors::{CoreError, SerializedError};
