use crate::resource::{Deletable, Resource};
use crate::transport::Access;
use crate::types::Order;

/// `/orders`: list and delete. New orders go through
/// [`OrderDraft`](crate::order_draft::OrderDraft).
///
/// The backend serves orders without authentication, and deleting one does
/// not ask for confirmation.
#[derive(Debug, Clone, Copy)]
pub struct Orders;

impl Resource for Orders {
    type Entity = Order;
    type Draft = ();

    const ENDPOINT: &'static str = "/orders";
    const NAME: &'static str = "order";
    const ACCESS: Access = Access::Anonymous;
    const LOAD_FAILED: &'static str = "Failed to load orders.";
}

impl Deletable for Orders {
    const DELETE_FAILED: &'static str = "Failed to delete order.";
    const CONFIRM_PROMPT: Option<&'static str> = None;
}
