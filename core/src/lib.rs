pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod generator;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod submit;
pub mod task;
pub mod tracker;
