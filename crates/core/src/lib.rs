//! Taxi Dispatch Core - Shared domain types.
//!
//! This crate provides the types shared by the dispatch components:
//! - `taxi-dispatch` - Operator web application
//! - `taxi-cli` - Command-line tools for provisioning and administration
//!
//! # Architecture
//!
//! The core crate contains only types and rules - no I/O, no database access,
//! no HTTP. The order lifecycle rules live here so that the web handlers,
//! the SQL guards, and the CLI all read them from one place.
//!
//! # Modules
//!
//! - [`types`] - Entity IDs, validated text fields, and the order status machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
