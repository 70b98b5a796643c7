//! Business services between the HTTP handlers and the repositories.
//!
//! - [`records`] - Create, look up, and delete clients, drivers, and orders
//! - [`lifecycle`] - Order status transitions
//! - [`forms`] - Raw operator input and its validation

pub mod error;
pub mod forms;
pub mod lifecycle;
pub mod records;

pub use error::DispatchError;
pub use lifecycle::OrderLifecycle;
pub use records::RecordService;
