//! The five resource collections of the console.

mod category;
mod customer;
mod item;
mod order;
mod stock;

pub use category::{CategoryDraft, CategoryPayload, ItemCategories};
pub use customer::{CustomerDraft, CustomerPayload, Customers};
pub use item::{CategoryKey, ItemDraft, ItemPayload, Items};
pub use order::Orders;
pub use stock::{StockDraft, StockPayload, Stocks};
