//! Command implementations for the unlockr CLI
//!
//! Each command is organized into its own module.

pub mod config;
pub mod crack;
pub mod space;
pub mod version;
