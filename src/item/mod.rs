//! Items: the things the household wants to buy or have gifted, plus the
//! pages and endpoints for managing them.

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod filter;
mod form;
mod items_page;
mod status_endpoint;
mod view;

pub use core::{
    Item, ItemBuilder, ItemName, ItemStatus, ItemWithGroup, count_items, create_item,
    create_item_table, delete_item, get_all_items, get_item, set_item_status, update_item,
};
pub use create_endpoint::create_item_endpoint;
pub use create_page::get_new_item_page;
pub use delete_endpoint::delete_item_endpoint;
pub use edit_endpoint::edit_item_endpoint;
pub use edit_page::get_edit_item_page;
pub use filter::{ItemFilter, filter_items};
pub use items_page::get_items_page;
pub use status_endpoint::item_status_endpoint;

pub(crate) use core::UNKNOWN_GROUP_LABEL;
