pub mod linear;
mod queries;

pub use linear::LinearTracker;
