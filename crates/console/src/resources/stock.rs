use serde::Serialize;

use posadmin_core::validate::require_non_negative;
use posadmin_core::{DomainResult, EntityId};

use crate::resource::{Deletable, Editable, Resource};
use crate::types::{Item, Stock};

/// `/stock`: list, create, update, delete (with confirmation).
#[derive(Debug, Clone, Copy)]
pub struct Stocks;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockDraft {
    /// Set when the draft was loaded from an existing record.
    pub stock_id: Option<EntityId>,
    pub quantity_available: i64,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPayload {
    pub stock_id: Option<EntityId>,
    pub quantity_available: i64,
    pub items: Vec<Item>,
}

impl Resource for Stocks {
    type Entity = Stock;
    type Draft = StockDraft;

    const ENDPOINT: &'static str = "/stock";
    const NAME: &'static str = "stock";
    const LOAD_FAILED: &'static str = "Failed to fetch stock data.";
}

impl Editable for Stocks {
    type Payload = StockPayload;

    const SAVE_FAILED: &'static str = "Failed to save stock.";
    const UPDATE_FAILED: &'static str = "Failed to update stock.";

    fn validate(draft: &StockDraft) -> DomainResult<()> {
        require_non_negative(draft.quantity_available, "Quantity cannot be negative.")
    }

    /// The body id follows the request target, never a stale draft id.
    fn payload(draft: &StockDraft, target: Option<EntityId>) -> StockPayload {
        StockPayload {
            stock_id: target,
            quantity_available: draft.quantity_available,
            items: draft.items.clone(),
        }
    }

    fn draft_from(stock: &Stock) -> StockDraft {
        StockDraft {
            stock_id: Some(stock.stock_id),
            quantity_available: stock.quantity_available,
            items: stock.items.clone(),
        }
    }
}

impl Deletable for Stocks {
    const DELETE_FAILED: &'static str = "Failed to delete stock.";
    const CONFIRM_PROMPT: Option<&'static str> = Some("Are you sure you want to delete this stock?");
}
