//! CLI subcommands.

pub mod common;
pub mod config;
pub mod dictionary;
pub mod generate;
pub mod resolve;
