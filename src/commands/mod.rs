//! CLI commands

pub mod check;
pub mod list;
pub mod render;
