//! # ado-core
//!
//! Core types and configuration for the Azure DevOps attachment tools.
//!
//! This crate provides the building blocks shared by the client and tool
//! layers:
//! - Work item identifier type
//! - Application configuration and environment loading

pub mod config;

pub use config::{
    AppConfig, ConfigError, ConnectionConfig, DirectoriesConfig, LoggingConfig, ServerConfig,
};

/// Work item identifier as assigned by Azure DevOps.
pub type WorkItemId = i32;
