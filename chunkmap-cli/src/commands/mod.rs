//! CLI subcommands.

pub mod assemble;
pub mod common;
pub mod config;
pub mod info;
pub mod init;
pub mod locate;
pub mod render;
