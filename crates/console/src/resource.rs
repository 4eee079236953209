//! Resource definitions: what varies between the CRUD screens.
//!
//! A [`Resource`] names a collection endpoint and its entity shape. The
//! optional capabilities are separate traits so that the controller only
//! offers operations the backend actually exposes for that collection:
//! [`Editable`] for create/update, [`Deletable`] for delete.

use core::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

use posadmin_core::{DomainResult, Entity, EntityId};

use crate::transport::Access;

pub trait Resource: Send + Sync + 'static {
    type Entity: Entity + DeserializeOwned + Clone + Debug + Send + Sync + 'static;

    /// Staging copy of the editable fields. `()` for read-only resources.
    type Draft: Default + Clone + Debug + Send + Sync + 'static;

    /// Collection path, e.g. `/itemcategory`.
    const ENDPOINT: &'static str;

    /// Human-readable name used in logs.
    const NAME: &'static str;

    /// Whether calls carry the session credential. Bearer resources refuse
    /// to load before login.
    const ACCESS: Access = Access::Bearer;

    const LOAD_FAILED: &'static str;
}

pub trait Editable: Resource {
    type Payload: Serialize + Send + Sync;

    const SAVE_FAILED: &'static str;
    const UPDATE_FAILED: &'static str;

    /// Required-field checks. Errors carry the message shown inline.
    fn validate(draft: &Self::Draft) -> DomainResult<()>;

    /// Map the draft to the request body the backend expects. `target` is
    /// the entity being updated, `None` on create.
    fn payload(draft: &Self::Draft, target: Option<EntityId>) -> Self::Payload;

    /// Populate a draft from an existing entity for editing.
    fn draft_from(entity: &Self::Entity) -> Self::Draft;
}

pub trait Deletable: Resource {
    const DELETE_FAILED: &'static str;

    /// Question asked before deleting; `None` deletes without asking.
    const CONFIRM_PROMPT: Option<&'static str>;
}
