use serde::Serialize;

use posadmin_core::validate::{require_non_empty, require_present};
use posadmin_core::{DomainResult, EntityId};

use crate::resource::{Editable, Resource};
use crate::types::Item;

/// `/item`: list, create, update.
#[derive(Debug, Clone, Copy)]
pub struct Items;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub price: f64,
    pub qty: i64,
    pub item_category_id: Option<EntityId>,
}

/// The backend takes the category as a nested reference, not a flat key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryKey {
    pub category_id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub name: String,
    pub price: f64,
    pub qty: i64,
    pub item_category: Option<CategoryKey>,
}

impl Resource for Items {
    type Entity = Item;
    type Draft = ItemDraft;

    const ENDPOINT: &'static str = "/item";
    const NAME: &'static str = "item";
    const LOAD_FAILED: &'static str = "Failed to load items.";
}

impl Editable for Items {
    type Payload = ItemPayload;

    const SAVE_FAILED: &'static str = "Failed to save item.";
    const UPDATE_FAILED: &'static str = "Failed to update item.";

    fn validate(draft: &ItemDraft) -> DomainResult<()> {
        require_non_empty(&draft.name, "Item name is required.")?;
        require_present(draft.item_category_id, "Please select an item category.")?;
        Ok(())
    }

    fn payload(draft: &ItemDraft, _target: Option<EntityId>) -> ItemPayload {
        ItemPayload {
            name: draft.name.clone(),
            price: draft.price,
            qty: draft.qty,
            item_category: draft
                .item_category_id
                .map(|category_id| CategoryKey { category_id }),
        }
    }

    fn draft_from(item: &Item) -> ItemDraft {
        ItemDraft {
            name: item.name.clone(),
            price: item.price,
            qty: item.qty,
            item_category_id: item.category_id(),
        }
    }
}
