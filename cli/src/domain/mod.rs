//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod resource;
pub mod response;
pub mod workflow;

pub use config::{ShellConfig, validate_config_key, validate_config_value};
pub use error::{ConfigError, ShellError, TaskError};
pub use resource::{
    CollectionKey, CreatedDroplet, Droplet, DropletSpec, DropletStatus, Image, JobStatus, Record,
    Region, Size, SshKey,
};
pub use response::{ApiResponse, ensure_ok, validate};
pub use workflow::{DropletAction, RETIRE_WORKFLOW, WorkflowStep};
