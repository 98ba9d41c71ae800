//! CLI subcommand implementations.

pub mod info;
pub mod init;
pub mod randomize;
pub mod render;
