//! Configuration module for the validation engine.
//!
//! This module handles loading TOML-based engine settings and the error type
//! shared by every fallible setup step.

mod config;

pub use config::{ConfigError, EngineConfig, DEFAULT_DISCRIMINATOR, DEFAULT_ERROR_LIMIT};
