use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::base::resource_id;
use crate::error::resource::{ValidationErrorKind, ValidationFieldError};

use super::{impl_entity, state_copy, state_ref, EntityData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

resource_id!(OrderStatus, "order::OrderStatus");

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ValidationFieldError::from_resource::<Self>(
                s.into(),
                String::new(),
                vec![ValidationErrorKind::UnknownVariant],
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderState {
    pub(in crate::domain) order_number: String,
    pub(in crate::domain) user_id: Uuid,
    pub(in crate::domain) order_date: DateTime<Utc>,
    pub(in crate::domain) status: OrderStatus,
    pub(in crate::domain) total_amount: Decimal,
    pub(in crate::domain) notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub(in crate::domain) data: EntityData<i64>,
    pub(in crate::domain) state: OrderState,
}

impl_entity!(Order, i64, OrderState);

impl Order {
    state_ref!(order_number, String);
    state_ref!(notes, Option<String>);
    state_copy!(user_id, Uuid);
    state_copy!(order_date, DateTime<Utc>);
    state_copy!(status, OrderStatus);
    state_copy!(total_amount, Decimal);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemState {
    pub(in crate::domain) product_id: i64,
    pub(in crate::domain) quantity: i32,
    pub(in crate::domain) unit_price: Decimal,
    pub(in crate::domain) total_price: Decimal,
}

#[derive(Debug, Clone)]
pub struct OrderItem {
    pub(in crate::domain) data: EntityData<i64>,
    pub(in crate::domain) state: OrderItemState,
}

impl_entity!(OrderItem, i64, OrderItemState);

impl OrderItem {
    state_copy!(product_id, i64);
    state_copy!(quantity, i32);
    state_copy!(unit_price, Decimal);
    state_copy!(total_price, Decimal);
}

/// Write model for an order insert; the order date and audit stamps are set
/// by the persistence layer.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub order_number: String,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub notes: Option<String>,
}

/// Write model for one order line.
#[derive(Debug, Clone)]
pub struct OrderItemDraft {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::OrderStatus;

    #[test]
    fn order_status_round_trips_through_its_symbolic_name() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_order_status_is_rejected() {
        assert!("refunded".parse::<OrderStatus>().is_err());
    }
}
