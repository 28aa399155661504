//! Core functionality for the Skydrop mission stack.
//!
//! This crate provides the configuration, logging and error types shared by
//! the monitor, mission and service crates.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, MissionDefaults, MonitorConfig, ReconcilerConfig};
pub use error::{CoreError, Result};
