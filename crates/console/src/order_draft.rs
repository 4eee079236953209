//! Order creation: the item catalog, the line accumulator, and submission.

use serde::Serialize;

use posadmin_core::validate::{require_non_empty, require_present};
use posadmin_core::{DomainError, EntityId, UserId};

use crate::error::{ConsoleError, ConsoleResult};
use crate::resource::Resource;
use crate::resources::{Items, Orders};
use crate::transport::{Access, ApiClient};
use crate::types::{Item, OrderDetail};

const CATALOG_FAILED: &str = "Failed to fetch items.";
const SAVE_FAILED: &str = "Failed to save order. Please try again.";

/// Lines of an order in progress, at most one per item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderLines {
    lines: Vec<OrderDetail>,
}

impl OrderLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `item`: bumps the existing line for that item, or
    /// appends a new line with quantity 1.
    pub fn add_item(&mut self, item: &Item) {
        match self.lines.iter_mut().find(|line| line.item_id() == item.id) {
            Some(line) => {
                line.quantity += 1;
                line.recompute_total();
            }
            None => self.lines.push(OrderDetail::for_item(item)),
        }
    }

    /// Drop the line for `item_id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, item_id: EntityId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.item_id() != item_id);
        self.lines.len() != before
    }

    pub fn lines(&self) -> &[OrderDetail] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Running total of the order: the sum of the line totals.
    pub fn total_amount(&self) -> f64 {
        self.lines.iter().map(|line| line.total_price).sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub item_id: EntityId,
    pub quantity: u32,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_id: EntityId,
    pub user_id: UserId,
    pub payment_method: String,
    pub items: Vec<OrderLineRequest>,
}

/// State of the "create order" screen.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    api: ApiClient,
    catalog: Vec<Item>,
    lines: OrderLines,
    customer_id: Option<EntityId>,
    user_id: Option<UserId>,
    payment_method: String,
    error: Option<String>,
}

impl OrderDraft {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            catalog: Vec::new(),
            lines: OrderLines::new(),
            customer_id: None,
            user_id: None,
            payment_method: String::new(),
            error: None,
        }
    }

    /// Items available to add, as last fetched.
    pub fn catalog(&self) -> &[Item] {
        &self.catalog
    }

    pub fn lines(&self) -> &[OrderDetail] {
        self.lines.lines()
    }

    pub fn total_amount(&self) -> f64 {
        self.lines.total_amount()
    }

    pub fn customer_id(&self) -> Option<EntityId> {
        self.customer_id
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_customer_id(&mut self, customer_id: EntityId) {
        self.customer_id = Some(customer_id);
    }

    pub fn set_user_id(&mut self, user_id: UserId) {
        self.user_id = Some(user_id);
    }

    pub fn set_payment_method(&mut self, payment_method: impl Into<String>) {
        self.payment_method = payment_method.into();
    }

    /// Fetch the item catalog. The backend serves it without a session.
    pub async fn load_catalog(&mut self) -> ConsoleResult<()> {
        match self.api.get_json::<Vec<Item>>(Items::ENDPOINT, Access::Anonymous).await {
            Ok(items) => {
                tracing::debug!(count = items.len(), "order catalog loaded");
                self.catalog = items;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch order catalog");
                self.error = Some(CATALOG_FAILED.to_string());
                Err(ConsoleError::request(CATALOG_FAILED, e))
            }
        }
    }

    pub fn add_item(&mut self, item: &Item) {
        self.lines.add_item(item);
    }

    pub fn remove_item(&mut self, item_id: EntityId) -> bool {
        self.lines.remove_item(item_id)
    }

    /// Map the draft to the request body, checking the header fields.
    pub fn request(&self) -> Result<OrderRequest, DomainError> {
        let customer_id = require_present(self.customer_id, "Customer ID is required.")?;
        let user_id = require_present(self.user_id, "User ID is required.")?;
        require_non_empty(&self.payment_method, "Payment method is required.")?;
        if self.lines.is_empty() {
            return Err(DomainError::validation("Add at least one item to the order."));
        }

        Ok(OrderRequest {
            customer_id,
            user_id,
            payment_method: self.payment_method.trim().to_string(),
            items: self
                .lines
                .lines()
                .iter()
                .map(|line| OrderLineRequest {
                    item_id: line.item_id(),
                    quantity: line.quantity,
                })
                .collect(),
        })
    }

    /// Post the order. On success the draft is discarded and the caller
    /// should move on to the order list; on failure everything is kept so the
    /// user can retry.
    pub async fn submit(&mut self) -> ConsoleResult<()> {
        let request = match self.request() {
            Ok(request) => request,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e.into());
            }
        };

        if let Err(e) = self.api.post_json(Orders::ENDPOINT, &request, Orders::ACCESS).await {
            tracing::error!(error = %e, "failed to save order");
            self.error = Some(SAVE_FAILED.to_string());
            return Err(ConsoleError::request(SAVE_FAILED, e));
        }

        tracing::info!(
            customer_id = %request.customer_id,
            lines = request.items.len(),
            "order submitted"
        );
        self.discard();
        Ok(())
    }

    /// Drop everything entered so far. The catalog is kept.
    pub fn discard(&mut self) {
        self.lines.clear();
        self.customer_id = None;
        self.user_id = None;
        self.payment_method.clear();
        self.error = None;
    }
}
