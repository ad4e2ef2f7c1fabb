//! CLI module for the vault engine

pub mod commands;

pub use commands::*;
