//! Entity shapes exchanged with the backend.
//!
//! Field names follow the backend's camelCase JSON. Text and list fields the
//! backend may send as `null` decode to their empty value.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use posadmin_core::{Entity, EntityId, UserId};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// ISO-8601 with or without an offset. Offset forms keep the wall-clock time
/// they were sent with; values that are not a recognisable timestamp decode
/// as absent instead of failing the whole record.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(raw)) => raw,
        _ => return Ok(None),
    };
    let raw = raw.trim();
    Ok(DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .ok()
        .or_else(|| raw.parse::<NaiveDateTime>().ok()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_id: EntityId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
}

impl Entity for Customer {
    fn id(&self) -> EntityId {
        self.customer_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCategory {
    pub category_id: EntityId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category_name: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
}

impl Entity for ItemCategory {
    fn id(&self) -> EntityId {
        self.category_id
    }
}

/// Category as embedded in an item (the item side of the many-to-one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCategoryRef {
    pub category_id: EntityId,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: EntityId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub qty: i64,
    #[serde(default)]
    pub item_category: Option<ItemCategoryRef>,
}

impl Item {
    pub fn category_id(&self) -> Option<EntityId> {
        self.item_category.as_ref().map(|c| c.category_id)
    }

    /// Category name for display, if the backend resolved one.
    pub fn category_name(&self) -> Option<&str> {
        self.item_category
            .as_ref()
            .map(|c| c.category_name.as_str())
            .filter(|name| !name.is_empty())
    }
}

impl Entity for Item {
    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub stock_id: EntityId,
    #[serde(default)]
    pub quantity_available: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Item>,
}

impl Entity for Stock {
    fn id(&self) -> EntityId {
        self.stock_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    pub customer_id: EntityId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUser {
    pub user_id: UserId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_name: String,
}

/// Item reference cached on an order line (name and price at order time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRef {
    pub item_id: EntityId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub item_name: String,
    #[serde(default)]
    pub unit_price: f64,
}

/// One line of an order: an item, how many, and the line total.
///
/// Lines of an order still being assembled have no `order_detail_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(default)]
    pub order_detail_id: Option<EntityId>,
    pub quantity: u32,
    #[serde(default)]
    pub total_price: f64,
    pub item: OrderItemRef,
}

impl OrderDetail {
    /// A fresh draft line for one unit of `item`.
    pub fn for_item(item: &Item) -> Self {
        Self {
            order_detail_id: None,
            quantity: 1,
            total_price: item.price,
            item: OrderItemRef {
                item_id: item.id,
                item_name: item.name.clone(),
                unit_price: item.price,
            },
        }
    }

    pub fn item_id(&self) -> EntityId {
        self.item.item_id
    }

    pub(crate) fn recompute_total(&mut self) {
        self.total_price = f64::from(self.quantity) * self.item.unit_price;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: EntityId,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub order_date_time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payment_method: String,
    #[serde(default)]
    pub customer: Option<OrderCustomer>,
    #[serde(default)]
    pub user: Option<OrderUser>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_details: Vec<OrderDetail>,
}

impl Entity for Order {
    fn id(&self) -> EntityId {
        self.order_id
    }
}
