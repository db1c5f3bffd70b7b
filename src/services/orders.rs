use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::email::templates;
use crate::error::AppError;
use crate::models::notification::NotificationKind;
use crate::models::order::{items_total, Order, OrderItem, OrderStatus};
use crate::models::profile::Role;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderSort {
    #[default]
    Newest,
    Oldest,
    TotalDesc,
    TotalAsc,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub buyer_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub search: Option<String>,
    #[serde(default)]
    pub sort: OrderSort,
}

impl OrderFilter {
    fn matches(&self, order: &Order, needle: Option<&str>) -> bool {
        if self.status.is_some_and(|status| order.status != status) {
            return false;
        }
        if self.buyer_id.is_some_and(|buyer| order.buyer_id != buyer) {
            return false;
        }
        if self.driver_id.is_some() && order.driver_id != self.driver_id {
            return false;
        }

        match needle {
            Some(needle) => {
                order.id.to_string().contains(needle)
                    || order.buyer_id.to_string().contains(needle)
                    || order
                        .items
                        .iter()
                        .any(|item| item.name.to_lowercase().contains(needle))
            }
            None => true,
        }
    }
}

pub fn apply_filter(orders: Vec<Order>, filter: &OrderFilter) -> Vec<Order> {
    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|needle| !needle.is_empty())
        .map(str::to_lowercase);

    let mut selected: Vec<Order> = orders
        .into_iter()
        .filter(|order| filter.matches(order, needle.as_deref()))
        .collect();

    match filter.sort {
        OrderSort::Newest => selected.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        OrderSort::Oldest => selected.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        OrderSort::TotalDesc => selected.sort_by(|a, b| b.total.cmp(&a.total)),
        OrderSort::TotalAsc => selected.sort_by(|a, b| a.total.cmp(&b.total)),
    }

    selected
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub buyer_id: Uuid,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub shipping_address: serde_json::Value,
}

pub async fn list_orders(state: &AppState, filter: &OrderFilter) -> Result<Vec<Order>, AppError> {
    let orders = state.store.list_orders().await?;
    Ok(apply_filter(orders, filter))
}

pub async fn get_order(state: &AppState, id: Uuid) -> Result<Order, AppError> {
    state
        .store
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {} not found", id)))
}

/// Rejects zero quantities and negative prices, then totals the items.
pub fn checked_items_total(items: &[OrderItem]) -> Result<Decimal, AppError> {
    if items
        .iter()
        .any(|item| item.quantity == 0 || item.price < Decimal::ZERO)
    {
        return Err(AppError::BadRequest(
            "item quantity must be > 0 and price >= 0".to_string(),
        ));
    }

    items_total(items).ok_or_else(AppError::amount_out_of_range)
}

pub async fn create_order(state: &AppState, new_order: NewOrder) -> Result<Order, AppError> {
    if new_order.items.is_empty() {
        return Err(AppError::BadRequest("order must contain items".to_string()));
    }

    let total = checked_items_total(&new_order.items)?;

    let now = Utc::now();
    let order = Order {
        id: Uuid::new_v4(),
        buyer_id: new_order.buyer_id,
        total,
        items: new_order.items,
        status: OrderStatus::Pending,
        driver_id: None,
        shipping_address: new_order.shipping_address,
        created_at: now,
        updated_at: now,
    };

    state.store.insert_order(order.clone()).await?;
    info!(order_id = %order.id, total = %order.total, "order created");

    Ok(order)
}

/// Any status may follow any other. The buyer is told in the background;
/// a failed notification never reaches the caller.
pub async fn update_order_status(
    state: &AppState,
    id: Uuid,
    status: OrderStatus,
) -> Result<Order, AppError> {
    let order = state.store.update_order_status(id, status).await?;

    state
        .metrics
        .order_status_updates_total
        .with_label_values(&[status.as_str()])
        .inc();
    info!(
        order_id = %order.id,
        status = status.as_str(),
        terminal = status.is_terminal(),
        "order status updated"
    );

    state.notifier.spawn_for_user(
        order.buyer_id,
        templates::order_status(order.id, status),
        NotificationKind::Order,
    );

    Ok(order)
}

pub async fn assign_driver(state: &AppState, id: Uuid, driver_id: Uuid) -> Result<Order, AppError> {
    let driver = state
        .store
        .get_profile(driver_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("driver {} not found", driver_id)))?;

    if driver.role != Role::Driver {
        return Err(AppError::BadRequest(format!(
            "user {} is not a driver",
            driver_id
        )));
    }

    let order = state.store.set_order_driver(id, driver_id).await?;
    info!(order_id = %order.id, driver_id = %driver_id, "driver assigned");

    let short_id: String = order.id.to_string().chars().take(8).collect();
    state.notifier.spawn_for_user(
        driver_id,
        templates::Notice {
            title: "New delivery assigned".to_string(),
            message: format!("Order #{short_id} has been assigned to you."),
        },
        NotificationKind::Order,
    );

    Ok(order)
}
