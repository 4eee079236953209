use serde::Serialize;

use posadmin_core::validate::require_min_trimmed_len;
use posadmin_core::{DomainResult, EntityId};

use crate::resource::{Deletable, Editable, Resource};
use crate::types::ItemCategory;

/// Shortest accepted category name, counted after trimming.
pub const MIN_CATEGORY_NAME_LEN: usize = 3;

/// `/itemcategory`: list, create, update, delete (with confirmation).
#[derive(Debug, Clone, Copy)]
pub struct ItemCategories;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDraft {
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    pub category_name: String,
}

impl Resource for ItemCategories {
    type Entity = ItemCategory;
    type Draft = CategoryDraft;

    const ENDPOINT: &'static str = "/itemcategory";
    const NAME: &'static str = "item category";
    const LOAD_FAILED: &'static str = "Failed to load item categories. Please try again.";
}

impl Editable for ItemCategories {
    type Payload = CategoryPayload;

    const SAVE_FAILED: &'static str = "Failed to save the category. Please try again.";
    const UPDATE_FAILED: &'static str = "Failed to save the category. Please try again.";

    fn validate(draft: &CategoryDraft) -> DomainResult<()> {
        require_min_trimmed_len(
            &draft.category_name,
            MIN_CATEGORY_NAME_LEN,
            "Category name must be at least 3 characters long.",
        )
    }

    fn payload(draft: &CategoryDraft, _target: Option<EntityId>) -> CategoryPayload {
        CategoryPayload {
            category_name: draft.category_name.trim().to_string(),
        }
    }

    fn draft_from(category: &ItemCategory) -> CategoryDraft {
        CategoryDraft {
            category_name: category.category_name.clone(),
        }
    }
}

impl Deletable for ItemCategories {
    const DELETE_FAILED: &'static str = "Failed to delete the category. Please try again.";
    const CONFIRM_PROMPT: Option<&'static str> = Some("Are you sure you want to delete this category?");
}
