//! Defines the core data models and database queries for items.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    database_id::{GroupId, ItemId},
};

/// The bucket items are aggregated under when their group no longer exists.
pub(crate) const UNKNOWN_GROUP_LABEL: &str = "Unknown";

/// A validated, non-empty item name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct ItemName(String);

impl ItemName {
    /// Create an item name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyItemName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyItemName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create an item name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ItemName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemName::new(s)
    }
}

impl Display for ItemName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where an item is in its purchase/gift lifecycle.
///
/// Items start out pending. A resident marks an item purchased once the
/// household has bought it themselves; an item becomes gifted when someone
/// buys it as a present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// The item still needs to be bought.
    Pending,
    /// The household bought the item themselves.
    Purchased,
    /// Someone bought the item as a gift.
    Gifted,
}

impl ItemStatus {
    /// All statuses, in lifecycle order. Used to render the status controls.
    pub const ALL: [ItemStatus; 3] = [
        ItemStatus::Pending,
        ItemStatus::Purchased,
        ItemStatus::Gifted,
    ];

    /// The status as the lowercase string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Purchased => "purchased",
            ItemStatus::Gifted => "gifted",
        }
    }

    /// The status as a capitalized label for display.
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "Pending",
            ItemStatus::Purchased => "Purchased",
            ItemStatus::Gifted => "Gifted",
        }
    }
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ItemStatus::Pending),
            "purchased" => Ok(ItemStatus::Purchased),
            "gifted" => Ok(ItemStatus::Gifted),
            _ => Err(Error::NotFound),
        }
    }
}

impl ToSql for ItemStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ItemStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().and_then(|raw_status| {
            raw_status.parse().map_err(|_| {
                FromSqlError::Other(format!("unknown item status {raw_status}").into())
            })
        })
    }
}

/// Something the household wants to buy or have gifted, e.g. a couch for the
/// living room.
///
/// To create a new `Item`, use [Item::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// The ID of the item.
    pub id: ItemId,
    /// What the item is called, e.g. 'Reading lamp'.
    pub name: ItemName,
    /// How much the item costs to buy, in dollars. Never negative.
    pub price: f64,
    /// The group (room) the item belongs to. `None` once the group has been
    /// deleted, in which case the item is aggregated under the
    /// [UNKNOWN_GROUP_LABEL] bucket.
    pub group_id: Option<GroupId>,
    /// Where the item is in its purchase/gift lifecycle.
    pub status: ItemStatus,
    /// The user that added the item to the list.
    pub created_by: UserID,
    /// The user that gifted the item. Only set while the status is gifted.
    pub gifted_by: Option<UserID>,
    /// When the item was added to the list.
    pub created_at: OffsetDateTime,
    /// When the item was last changed.
    pub updated_at: OffsetDateTime,
}

impl Item {
    /// Create a new item.
    ///
    /// Shortcut for [ItemBuilder] for discoverability.
    pub fn build(name: ItemName, price: f64, created_by: UserID) -> ItemBuilder {
        ItemBuilder {
            name,
            price,
            group_id: None,
            created_by,
        }
    }
}

/// A builder for creating [Item] instances.
#[derive(Debug, PartialEq, Clone)]
pub struct ItemBuilder {
    /// What the item is called.
    pub name: ItemName,
    /// How much the item costs to buy, in dollars.
    pub price: f64,
    /// The group (room) the item belongs to.
    pub group_id: Option<GroupId>,
    /// The user adding the item to the list.
    pub created_by: UserID,
}

impl ItemBuilder {
    /// Set the group for the item.
    pub fn group_id(mut self, group_id: Option<GroupId>) -> Self {
        self.group_id = group_id;
        self
    }
}

/// An item annotated with its group's display name, the record shape consumed
/// by the items page and the filter engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemWithGroup {
    /// The item itself.
    pub item: Item,
    /// The display name of the item's group, or [UNKNOWN_GROUP_LABEL] when the
    /// group row no longer exists.
    pub group_name: String,
}

/// Check that `price` is a usable item price.
///
/// # Errors
/// Returns an [Error::InvalidPrice] if `price` is negative, NaN or infinite.
fn validate_price(price: f64) -> Result<f64, Error> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(Error::InvalidPrice(price))
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new item in the database from a builder.
///
/// New items always start out pending.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidPrice] if the price is negative or not finite,
/// - [Error::InvalidGroup] if the specified group ID does not refer to a real group,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_item(builder: ItemBuilder, connection: &Connection) -> Result<Item, Error> {
    let price = validate_price(builder.price)?;
    let now = OffsetDateTime::now_utc();

    let item = connection
        .prepare(
            "INSERT INTO item (name, price, group_id, status, created_by, gifted_by, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6, ?6)
             RETURNING id, name, price, group_id, status, created_by, gifted_by, created_at, updated_at",
        )?
        .query_row(
            (
                builder.name.as_ref(),
                price,
                builder.group_id,
                ItemStatus::Pending,
                builder.created_by.as_i64(),
                now,
            ),
            map_item_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidGroup(builder.group_id),
            error => error.into(),
        })?;

    Ok(item)
}

/// Retrieve an item from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid item,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_item(id: ItemId, connection: &Connection) -> Result<Item, Error> {
    let item = connection
        .prepare(
            "SELECT id, name, price, group_id, status, created_by, gifted_by, created_at, updated_at
             FROM item WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_item_row)?;

    Ok(item)
}

/// Update an item's name, price and group.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidPrice] if the price is negative or not finite,
/// - [Error::InvalidGroup] if the specified group ID does not refer to a real group,
/// - [Error::UpdateMissingItem] if `id` does not refer to a valid item,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_item(
    id: ItemId,
    name: ItemName,
    price: f64,
    group_id: Option<GroupId>,
    connection: &Connection,
) -> Result<(), Error> {
    let price = validate_price(price)?;

    let rows_affected = connection
        .execute(
            "UPDATE item SET name = ?1, price = ?2, group_id = ?3, updated_at = ?4 WHERE id = ?5",
            (
                name.as_ref(),
                price,
                group_id,
                OffsetDateTime::now_utc(),
                id,
            ),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidGroup(group_id),
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingItem);
    }

    Ok(())
}

/// Set an item's status.
///
/// When the new status is gifted, `changed_by` is recorded as the gifter.
/// Otherwise the gifted-by marker is cleared, so it is only ever set while
/// the item is actually gifted.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingItem] if `id` does not refer to a valid item,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn set_item_status(
    id: ItemId,
    status: ItemStatus,
    changed_by: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let gifted_by = match status {
        ItemStatus::Gifted => Some(changed_by.as_i64()),
        _ => None,
    };

    let rows_affected = connection.execute(
        "UPDATE item SET status = ?1, gifted_by = ?2, updated_at = ?3 WHERE id = ?4",
        (status, gifted_by, OffsetDateTime::now_utc(), id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingItem);
    }

    Ok(())
}

/// Delete an item by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingItem] if `id` does not refer to a valid item,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_item(id: ItemId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM item WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingItem);
    }

    Ok(())
}

/// Retrieve all items with their group names, newest first.
///
/// Items whose group has been deleted get the [UNKNOWN_GROUP_LABEL] group name.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_all_items(connection: &Connection) -> Result<Vec<ItemWithGroup>, Error> {
    connection
        .prepare(&format!(
            "SELECT
                item.id, item.name, item.price, item.group_id, item.status,
                item.created_by, item.gifted_by, item.created_at, item.updated_at,
                COALESCE(\"group\".name, '{UNKNOWN_GROUP_LABEL}') AS group_name
            FROM item
            LEFT JOIN \"group\" ON \"group\".id = item.group_id
            ORDER BY item.created_at DESC, item.id DESC"
        ))?
        .query_map([], |row| {
            let item = map_item_row(row)?;
            let group_name = row.get(9)?;

            Ok(ItemWithGroup { item, group_name })
        })?
        .map(|maybe_item| maybe_item.map_err(|error| error.into()))
        .collect()
}

/// Get the total number of items in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn count_items(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM item;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the item table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_item_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS item (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                price REAL NOT NULL,
                group_id INTEGER,
                status TEXT NOT NULL DEFAULT 'pending',
                created_by INTEGER NOT NULL,
                gifted_by INTEGER,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(group_id) REFERENCES \"group\"(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    // Add index used by the items page and group counts.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_item_group ON item(group_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an Item.
fn map_item_row(row: &Row) -> Result<Item, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let price = row.get(2)?;
    let group_id = row.get(3)?;
    let status = row.get(4)?;
    let created_by: i64 = row.get(5)?;
    let gifted_by: Option<i64> = row.get(6)?;
    let created_at = row.get(7)?;
    let updated_at = row.get(8)?;

    Ok(Item {
        id,
        name: ItemName::new_unchecked(&raw_name),
        price,
        group_id,
        status,
        created_by: UserID::new(created_by),
        gifted_by: gifted_by.map(UserID::new),
        created_at,
        updated_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================
