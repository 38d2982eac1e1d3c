//! Database queries for retrieving dashboard item data.
//!
//! This module provides a simplified item view optimized for dashboard
//! aggregations, containing only the fields needed for the summaries
//! (price, status, group name).

use rusqlite::Connection;

use crate::{Error, item::{ItemStatus, UNKNOWN_GROUP_LABEL}};

/// A simplified item view for dashboard aggregations.
///
/// This is separate from the main Item domain model because the dashboard
/// only needs price, status, and group name for its summaries.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ItemRecord {
    pub price: f64,
    pub status: ItemStatus,
    pub group_name: String,
}

/// Gets every item with its group name, in insertion order.
///
/// Items whose group has been deleted are bucketed under
/// [UNKNOWN_GROUP_LABEL] instead of being dropped.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - Database connection fails
/// - SQL query preparation or execution fails
pub(super) fn get_item_records(connection: &Connection) -> Result<Vec<ItemRecord>, Error> {
    connection
        .prepare(&format!(
            "SELECT
                item.price,
                item.status,
                COALESCE(\"group\".name, '{UNKNOWN_GROUP_LABEL}') AS group_name
            FROM item
            LEFT JOIN \"group\" ON \"group\".id = item.group_id
            ORDER BY item.id ASC"
        ))?
        .query_map([], |row| {
            Ok(ItemRecord {
                price: row.get(0)?,
                status: row.get(1)?,
                group_name: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<ItemRecord>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::get_item_records;
    use crate::{
        auth::UserID,
        db::initialize,
        group::{GroupName, create_group},
        item::{Item, ItemName, ItemStatus, create_item, set_item_status},
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn returns_items_with_group_names() {
        let conn = get_test_connection();
        let group = create_group(
            GroupName::new_unchecked("Guest Room"),
            UserID::new(1),
            &conn,
        )
        .unwrap();
        create_item(
            Item::build(ItemName::new_unchecked("Lamp"), 10.0, UserID::new(1))
                .group_id(Some(group.id)),
            &conn,
        )
        .unwrap();
        let gifted = create_item(
            Item::build(ItemName::new_unchecked("Vase"), 25.0, UserID::new(1))
                .group_id(Some(group.id)),
            &conn,
        )
        .unwrap();
        set_item_status(gifted.id, ItemStatus::Gifted, UserID::new(1), &conn).unwrap();

        let records = get_item_records(&conn).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].group_name, "Guest Room");
        assert_eq!(records[0].status, ItemStatus::Pending);
        assert_eq!(records[1].status, ItemStatus::Gifted);

        let total: f64 = records.iter().map(|record| record.price).sum();
        assert_eq!(total, 35.0);
    }

    #[test]
    fn returns_empty_vec_for_no_items() {
        let conn = get_test_connection();

        let records = get_item_records(&conn).unwrap();

        assert_eq!(records.len(), 0);
    }

    #[test]
    fn buckets_items_with_deleted_group_under_unknown() {
        let conn = get_test_connection();
        let group = create_group(GroupName::new_unchecked("Attic"), UserID::new(1), &conn).unwrap();
        create_item(
            Item::build(ItemName::new_unchecked("Dust filter"), 5.0, UserID::new(1))
                .group_id(Some(group.id)),
            &conn,
        )
        .unwrap();

        conn.execute("DELETE FROM \"group\" WHERE id = ?1", [group.id])
            .unwrap();

        let records = get_item_records(&conn).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].group_name, "Unknown");
    }
}
