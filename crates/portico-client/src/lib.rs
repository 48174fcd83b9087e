//! Service client implementations for the Portico proxy API
//!
//! This crate provides implementations of the `ServiceClient` contract
//! defined in `portico-core`: an HTTP client for a real business-object
//! service endpoint, and an in-memory scripted client for development and
//! tests.

#![forbid(unsafe_code)]

pub mod http;
pub use http::HttpServiceClient;

pub mod memory;
pub use memory::MemoryServiceClient;
