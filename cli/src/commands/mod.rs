//! Command implementations

pub mod config;
pub mod droplet;
pub mod event;
pub mod list;
pub mod retire;
pub mod shell;
pub mod snapshot;
pub mod version;
