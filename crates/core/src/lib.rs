//! Tienda Core - Shared domain types.
//!
//! This crate provides the common types used across the Tienda components:
//! - `server` - The web service (account API + product gateway)
//! - `integration-tests` - End-to-end test suite
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
