//! Database operations for groups.

use std::collections::HashMap;

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    database_id::GroupId,
    group::{Group, GroupName},
};

/// The room groups seeded when the database is created.
const SYSTEM_GROUPS: [&str; 6] = [
    "Bathroom",
    "Bedroom",
    "Kitchen",
    "Laundry",
    "Living Room",
    "Office",
];

/// Create a custom group and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateGroupName] if a group with the same name already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_group(
    name: GroupName,
    created_by: UserID,
    connection: &Connection,
) -> Result<Group, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection
        .execute(
            "INSERT INTO \"group\" (name, created_by, is_custom, created_at)
             VALUES (?1, ?2, 1, ?3);",
            (name.as_ref(), created_by.as_i64(), created_at),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateGroupName(name.to_string()),
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(Group {
        id,
        name,
        created_by: Some(created_by),
        is_custom: true,
        created_at,
    })
}

/// Retrieve a single group by ID.
pub fn get_group(group_id: GroupId, connection: &Connection) -> Result<Group, Error> {
    connection
        .prepare(
            "SELECT id, name, created_by, is_custom, created_at FROM \"group\" WHERE id = :id;",
        )?
        .query_row(&[(":id", &group_id)], map_group_row)
        .map_err(|error| error.into())
}

/// Retrieve all groups ordered alphabetically by name.
pub fn get_all_groups(connection: &Connection) -> Result<Vec<Group>, Error> {
    connection
        .prepare(
            "SELECT id, name, created_by, is_custom, created_at FROM \"group\" ORDER BY name ASC;",
        )?
        .query_map([], map_group_row)?
        .map(|maybe_group| maybe_group.map_err(|error| error.into()))
        .collect()
}

/// Delete a custom group by ID.
///
/// Items in the group are kept and fall back to the "Unknown" bucket in
/// aggregations (the foreign key sets their group to NULL).
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingGroup] if `group_id` does not refer to a group,
/// - [Error::DeleteSystemGroup] if the group is one of the seeded system groups,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_group(group_id: GroupId, connection: &Connection) -> Result<(), Error> {
    let group = match get_group(group_id, connection) {
        Ok(group) => group,
        Err(Error::NotFound) => return Err(Error::DeleteMissingGroup),
        Err(error) => return Err(error),
    };

    if !group.is_custom {
        return Err(Error::DeleteSystemGroup);
    }

    let rows_affected = connection.execute("DELETE FROM \"group\" WHERE id = ?1", [group_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingGroup);
    }

    Ok(())
}

/// Count the number of items in each group.
///
/// Groups with no items are absent from the returned map.
pub fn count_items_per_group(connection: &Connection) -> Result<HashMap<GroupId, u32>, Error> {
    let result: Result<HashMap<GroupId, u32>, rusqlite::Error> = connection
        .prepare(
            "SELECT group_id, COUNT(1) FROM item WHERE group_id IS NOT NULL GROUP BY group_id",
        )?
        .query_map((), |row| {
            let group_id = row.get(0)?;
            let count = row.get(1)?;

            Ok((group_id, count))
        })?
        .collect();

    result.map_err(Error::from)
}

/// Initialize the group table and indexes.
pub fn create_group_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"group\" (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            created_by INTEGER,
            is_custom INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_group_name ON \"group\"(name);",
    )?;

    Ok(())
}

/// Insert the system room groups if they are not already present.
pub fn seed_system_groups(connection: &Connection) -> Result<(), rusqlite::Error> {
    let created_at = OffsetDateTime::now_utc();

    for name in SYSTEM_GROUPS {
        connection.execute(
            "INSERT OR IGNORE INTO \"group\" (name, created_by, is_custom, created_at)
             VALUES (?1, NULL, 0, ?2);",
            (name, created_at),
        )?;
    }

    Ok(())
}

fn map_group_row(row: &Row) -> Result<Group, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let created_by: Option<i64> = row.get(2)?;
    let is_custom = row.get(3)?;
    let created_at = row.get(4)?;

    Ok(Group {
        id,
        name: GroupName::new_unchecked(&raw_name),
        created_by: created_by.map(UserID::new),
        is_custom,
        created_at,
    })
}
