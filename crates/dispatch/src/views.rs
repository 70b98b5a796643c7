//! Template view models.
//!
//! Views flatten domain models into display strings so templates stay free
//! of formatting logic.

use askama::Template;
use askama_web::WebTemplate;

use taxi_dispatch_core::{OrderStatus, OrderTransition};

use crate::models::{Client, Driver, Order};

/// Generic one-line result page ("Client added", error messages).
#[derive(Template, WebTemplate)]
#[template(path = "message.html")]
pub struct MessageTemplate {
    pub title: String,
    pub message: String,
    pub is_error: bool,
}

impl MessageTemplate {
    /// Success page.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            title: "Done".to_string(),
            message: message.into(),
            is_error: false,
        }
    }

    /// Failure page.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
            is_error: true,
        }
    }
}

/// Client view for templates.
#[derive(Debug, Clone)]
pub struct ClientView {
    pub id: i64,
    pub name: String,
    pub vip: &'static str,
}

impl From<&Client> for ClientView {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id.as_i64(),
            name: client.name.to_string(),
            vip: if client.is_vip { "Yes" } else { "No" },
        }
    }
}

/// Driver view for templates.
#[derive(Debug, Clone)]
pub struct DriverView {
    pub id: i64,
    pub name: String,
    pub car: String,
}

impl From<&Driver> for DriverView {
    fn from(driver: &Driver) -> Self {
        Self {
            id: driver.id.as_i64(),
            name: driver.name.to_string(),
            car: driver.car.to_string(),
        }
    }
}

/// Order view for templates.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: i64,
    pub address_from: String,
    pub address_to: String,
    pub client: String,
    pub driver: String,
    pub date_created: String,
    pub status: &'static str,
    pub status_class: &'static str,
    /// Whether the assign form should be offered.
    pub can_assign: bool,
    /// Whether the cancel button should be offered.
    pub can_cancel: bool,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        let unassigned = || "—".to_string();
        let status_class = match order.status {
            OrderStatus::NotAccepted => "status-pending",
            OrderStatus::InProgress => "status-active",
            OrderStatus::Done => "status-done",
            OrderStatus::Cancelled => "status-cancelled",
        };

        Self {
            id: order.id.as_i64(),
            address_from: order.address_from.to_string(),
            address_to: order.address_to.to_string(),
            client: if order.client_id.is_unassigned() {
                unassigned()
            } else {
                order.client_id.to_string()
            },
            driver: if order.driver_id.is_unassigned() {
                unassigned()
            } else {
                order.driver_id.to_string()
            },
            date_created: order.date_created.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            status: order.status.as_str(),
            status_class,
            can_assign: order.status.permits(OrderTransition::Assign),
            can_cancel: order.status.permits(OrderTransition::Cancel),
        }
    }
}
