//! # fortigate-core
//!
//! Core types and utilities for working with FortiGate firewalls.
//!
//! This crate provides the shared error type, connection configuration and HTTP
//! client settings used by the FortiGate API client and the MCP adapter.
//!
//! ## Modules
//!
//! - [`error`] - Error types, error kinds and the uniform error response
//! - [`ids`] - Strongly-typed numeric identifiers for FortiOS table entries
//! - [`types`] - Connection scheme and related constants
//! - [`config`] - Device connection configuration and credentials
//! - [`client`] - HTTP client settings
//! - [`query`] - URL query parameter builder

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod ids;
pub mod query;
pub mod types;

// Re-export commonly used types
pub use error::{Error, ErrorKind, ErrorResponse, Result};
