//! MCP server for FortiGate firewalls.
//!
//! This crate exposes FortiGate configuration operations (policies,
//! interfaces, static routes, address and service objects) as MCP tools over
//! stdio. Every tool returns a JSON mapping; failures use the uniform
//! `{"error": ..., "details": ...}` shape instead of protocol errors.

#![deny(missing_docs)]

pub mod response;
mod server;
pub mod tools;

pub use server::FortiGateMcpServer;
