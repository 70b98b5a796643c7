//! Domain models for the dispatch database.
//!
//! - [`Client`] - A passenger
//! - [`Driver`] - A driver and their car
//! - [`Order`] - A ride request moving through the status lifecycle

pub mod client;
pub mod driver;
pub mod order;

pub use client::{Client, NewClient};
pub use driver::{Driver, NewDriver};
pub use order::{Assignment, NewOrder, Order};
