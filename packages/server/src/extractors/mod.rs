pub mod item_form;
pub mod json;
