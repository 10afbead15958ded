//! Subcommand implementations

pub mod catalog;
pub mod config;
pub mod doctor;
pub mod recommend;
pub mod serve;
