//! Typed HTTP binding for the Stockroom items API.
//!
//! [`ItemsClient`] mirrors every route; [`ItemsState`] keeps the last known
//! item list for a UI and is passed explicitly to whatever renders it.

mod draft;
mod error;
mod http;
mod state;

pub use common::{Attribute, Item, Variant};
pub use draft::{ImageFile, ItemDraft};
pub use error::{ClientError, ClientResult};
pub use http::ItemsClient;
pub use state::ItemsState;
