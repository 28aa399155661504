//! Configuration management for Skydrop.
//!
//! Configuration is read from a TOML file. Every section is optional and
//! falls back to the values the mission stack was flown with.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Runtime monitor settings
    pub monitor: MonitorConfig,
    /// Gating reconciler settings
    pub reconciler: ReconcilerConfig,
    /// Mission defaults
    pub mission: MissionDefaults,
}

/// Runtime monitor settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Path to the compiled monitor description
    pub property_file: PathBuf,
}

/// Gating reconciler settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Period between reconciler ticks in milliseconds
    pub tick_interval_ms: u64,
    /// Planar distance (degrees) under which the release mechanism is unlocked
    pub proximity_threshold_deg: f64,
    /// Status reporting period requested from the vehicle in milliseconds
    pub status_period_ms: u32,
    /// Capacity of the bounded status report queue
    pub status_queue_depth: usize,
}

/// Mission defaults applied before parameters are set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MissionDefaults {
    /// Takeoff altitude in meters used until mission parameters provide one
    pub default_takeoff_altitude_m: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            property_file: PathBuf::from("monitors/prop1.mon"),
        }
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 500,
            proximity_threshold_deg: 1e-3,
            status_period_ms: 2000,
            status_queue_depth: 64,
        }
    }
}

impl Default for MissionDefaults {
    fn default() -> Self {
        Self {
            default_takeoff_altitude_m: 2.0,
        }
    }
}

impl ReconcilerConfig {
    /// Tick period as a [`Duration`].
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Configuration with every default applied.
    pub fn default_config() -> Self {
        Self::default()
    }
}
