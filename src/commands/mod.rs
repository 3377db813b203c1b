//! CLI subcommand implementations

pub mod like;
pub mod list;
pub mod search;
pub mod show;
pub mod timeline;
