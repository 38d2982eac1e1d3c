//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// Identifier for a row in the item table.
pub type ItemId = DatabaseId;
/// Identifier for a row in the group table.
pub type GroupId = DatabaseId;
