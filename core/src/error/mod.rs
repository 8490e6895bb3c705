#[allow(clippy::module_inception)]
pub mod error;

pub use error::CliError;
