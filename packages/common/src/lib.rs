pub mod config;
pub mod envelope;
pub mod item;
pub mod sku;
pub mod storage;

pub use envelope::Envelope;
pub use item::{
    Attribute, DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_QUANTITY, DEFAULT_UNIT, Item, Variant,
    is_low_stock,
};
pub use sku::generate_sku;
