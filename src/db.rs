//! Database initialization for the application.

use rusqlite::Connection;

use crate::{
    auth::create_user_table,
    group::{create_group_table, seed_system_groups},
    item::create_item_table,
};

/// Create the application tables and seed the system room groups.
///
/// This function is idempotent: tables are only created if they do not exist
/// and the system groups are only inserted once.
///
/// # Errors
/// Returns an error if any of the tables cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    create_user_table(connection)?;
    create_group_table(connection)?;
    create_item_table(connection)?;
    seed_system_groups(connection)?;

    Ok(())
}
