//! Operator form input and its validation.
//!
//! Every field is optional at the deserialization layer so that a missing
//! field surfaces as a [`DispatchError::Validation`] naming it, rather than as
//! a framework rejection.

use serde::Deserialize;

use taxi_dispatch_core::{Address, CarDescription, ClientId, DriverId, OrderId, PersonName, TextError};

use super::DispatchError;
use crate::models::{Assignment, NewClient, NewDriver, NewOrder};

/// `POST /new_client`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientForm {
    pub name: Option<String>,
    pub is_vip: Option<String>,
}

impl ClientForm {
    /// Validate into a [`NewClient`].
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Validation` naming the first bad field.
    pub fn validate(&self) -> Result<NewClient, DispatchError> {
        Ok(NewClient {
            name: text_field("name", self.name.as_deref(), PersonName::parse)?,
            is_vip: vip_flag(self.is_vip.as_deref())?,
        })
    }
}

/// `POST /new_driver`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriverForm {
    pub name: Option<String>,
    pub car: Option<String>,
}

impl DriverForm {
    /// Validate into a [`NewDriver`].
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Validation` naming the first bad field.
    pub fn validate(&self) -> Result<NewDriver, DispatchError> {
        Ok(NewDriver {
            name: text_field("name", self.name.as_deref(), PersonName::parse)?,
            car: text_field("car", self.car.as_deref(), CarDescription::parse)?,
        })
    }
}

/// `POST /add_order`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderForm {
    pub address_from: Option<String>,
    pub address_to: Option<String>,
}

impl OrderForm {
    /// Validate into a [`NewOrder`].
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Validation` naming the first bad field.
    pub fn validate(&self) -> Result<NewOrder, DispatchError> {
        Ok(NewOrder {
            address_from: text_field("address_from", self.address_from.as_deref(), Address::parse)?,
            address_to: text_field("address_to", self.address_to.as_deref(), Address::parse)?,
        })
    }
}

/// `POST /show_order/{id}/change`
///
/// Field names keep the capitalisation the operator pages have always used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignForm {
    #[serde(rename = "Client_id")]
    pub client_id: Option<String>,
    #[serde(rename = "Driver_id")]
    pub driver_id: Option<String>,
}

impl AssignForm {
    /// Validate into an [`Assignment`].
    ///
    /// The unassigned placeholder (0) is not a valid target.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Validation` naming the first bad field.
    pub fn validate(&self) -> Result<Assignment, DispatchError> {
        let client_id: ClientId = id_field("Client_id", self.client_id.as_deref())?;
        let driver_id: DriverId = id_field("Driver_id", self.driver_id.as_deref())?;
        Ok(Assignment {
            client_id,
            driver_id,
        })
    }
}

/// `POST /show_order`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderLookupForm {
    pub order_id: Option<String>,
}

impl OrderLookupForm {
    /// # Errors
    ///
    /// Returns `DispatchError::Validation` if the id is missing or not a positive integer.
    pub fn validate(&self) -> Result<OrderId, DispatchError> {
        id_field("order_id", self.order_id.as_deref())
    }
}

/// `POST /show_client`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientLookupForm {
    pub client_id: Option<String>,
}

impl ClientLookupForm {
    /// # Errors
    ///
    /// Returns `DispatchError::Validation` if the id is missing or not a positive integer.
    pub fn validate(&self) -> Result<ClientId, DispatchError> {
        id_field("client_id", self.client_id.as_deref())
    }
}

/// `POST /show_driver`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriverLookupForm {
    pub driver_id: Option<String>,
}

impl DriverLookupForm {
    /// # Errors
    ///
    /// Returns `DispatchError::Validation` if the id is missing or not a positive integer.
    pub fn validate(&self) -> Result<DriverId, DispatchError> {
        id_field("driver_id", self.driver_id.as_deref())
    }
}

fn text_field<T>(
    field: &'static str,
    value: Option<&str>,
    parse: impl FnOnce(&str) -> Result<T, TextError>,
) -> Result<T, DispatchError> {
    let raw = value.ok_or_else(|| DispatchError::missing(field))?;
    parse(raw).map_err(|e| DispatchError::invalid_text(field, &e))
}

fn id_field<T: From<i64>>(field: &'static str, value: Option<&str>) -> Result<T, DispatchError> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DispatchError::missing(field))?;

    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(T::from(id)),
        _ => Err(DispatchError::Validation {
            field,
            reason: format!("'{raw}' is not a positive integer id"),
        }),
    }
}

/// Coerce the VIP selector value to a flag.
fn vip_flag(value: Option<&str>) -> Result<bool, DispatchError> {
    let raw = value.ok_or_else(|| DispatchError::missing("is_vip"))?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        _ => Err(DispatchError::Validation {
            field: "is_vip",
            reason: format!("'{raw}' is not a yes/no value"),
        }),
    }
}
