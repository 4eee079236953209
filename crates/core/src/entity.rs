//! Entity trait: server-assigned identity.

use crate::id::EntityId;

/// A resource entity as returned by the backend.
///
/// Anything the backend hands back has already been assigned an identifier,
/// so the id is not optional here. Drafts that have not been created yet are
/// a separate type.
pub trait Entity {
    /// Returns the server-assigned identifier.
    fn id(&self) -> EntityId;
}
