pub mod factory;
pub mod generator;
pub mod http_error;
pub mod services;
pub mod tracker;

pub use http_error::{ApiHttpError, ApiHttpErrorKind};
