pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod intake;
pub mod render;
pub mod session;
