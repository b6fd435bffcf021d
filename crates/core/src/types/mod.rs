//! Shared type definitions.

mod claims;
mod id;
mod order;
mod product;
mod role;
mod session;
mod vendor;

pub use claims::Claims;
pub use id::{OrderId, ProductId, UserId, VendorApplicationId};
pub use order::{Contact, Order, OrderReceipt};
pub use product::Product;
pub use role::{Role, VendorStatus};
pub use session::Session;
pub use vendor::VendorApplication;
