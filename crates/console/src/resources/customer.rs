use serde::Serialize;

use posadmin_core::validate::require_non_empty;
use posadmin_core::{DomainResult, EntityId};

use crate::resource::{Editable, Resource};
use crate::types::Customer;

/// `/customer`: list, create, update.
#[derive(Debug, Clone, Copy)]
pub struct Customers;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDraft {
    pub name: String,
    pub contact: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerPayload {
    pub name: String,
    pub contact: String,
    pub address: String,
}

impl Resource for Customers {
    type Entity = Customer;
    type Draft = CustomerDraft;

    const ENDPOINT: &'static str = "/customer";
    const NAME: &'static str = "customer";
    const LOAD_FAILED: &'static str = "Failed to load customers.";
}

impl Editable for Customers {
    type Payload = CustomerPayload;

    const SAVE_FAILED: &'static str = "Failed to save customer.";
    const UPDATE_FAILED: &'static str = "Failed to update customer.";

    fn validate(draft: &CustomerDraft) -> DomainResult<()> {
        require_non_empty(&draft.name, "Customer name is required.")?;
        require_non_empty(&draft.contact, "Customer contact is required.")?;
        require_non_empty(&draft.address, "Customer address is required.")
    }

    fn payload(draft: &CustomerDraft, _target: Option<EntityId>) -> CustomerPayload {
        CustomerPayload {
            name: draft.name.clone(),
            contact: draft.contact.clone(),
            address: draft.address.clone(),
        }
    }

    fn draft_from(customer: &Customer) -> CustomerDraft {
        CustomerDraft {
            name: customer.name.clone(),
            contact: customer.contact.clone(),
            address: customer.address.clone(),
        }
    }
}
