pub mod cli;
pub mod linear;
pub mod tasks;
