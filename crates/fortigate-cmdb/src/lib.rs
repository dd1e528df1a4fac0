//! FortiOS CMDB client and request models.
//!
//! Provides the table bindings, validated request models and an asynchronous
//! client for the FortiOS configuration REST API (`/api/v2/cmdb`). Callers
//! depend on the [`CmdbApi`] trait so a session can be swapped for a mock.

#![deny(missing_docs)]

pub mod api;
pub mod client;
pub mod models;
pub mod tables;

pub use api::CmdbApi;
#[cfg(any(test, feature = "mock"))]
pub use api::MockCmdbApi;
pub use client::{CmdbClient, CmdbClientBuilder};
pub use models::{
    AddressKind, AddressObject, AddressType, Fields, InterfaceConfig, InterfaceType, MovePosition,
    PolicyAction, PolicyConfig, PolicyUpdate, ServiceGroup, ServiceKind, ServiceObject,
    ServiceProtocol, StaticRouteConfig, Status,
};
pub use tables::CmdbTable;

/// Convenient result alias that reuses the shared FortiGate error type.
pub type Result<T> = fortigate_core::Result<T>;
