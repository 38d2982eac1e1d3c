//! Groups: the named buckets (rooms) that items belong to.

mod create_endpoint;
mod db;
mod delete_endpoint;
mod domain;
mod list;

pub use create_endpoint::create_group_endpoint;
pub use db::{
    count_items_per_group, create_group, create_group_table, delete_group, get_all_groups,
    get_group, seed_system_groups,
};
pub use delete_endpoint::delete_group_endpoint;
pub use domain::{Group, GroupName};
pub use list::get_groups_page;

pub(crate) use domain::GroupFormData;
