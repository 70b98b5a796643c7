//! Core types for taxi dispatch.

pub mod id;
pub mod status;
pub mod text;

pub use id::*;
pub use status::{OrderStatus, OrderTransition, ParseStatusError, TransitionError};
pub use text::{Address, CarDescription, MAX_TEXT_LEN, PersonName, TextError};
