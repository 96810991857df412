use chrono::NaiveDateTime;
use diesel::prelude::*;

/// ItemRequest model for reading from database.
///
/// A want-ad for an item that is not listed yet. Immutable after creation;
/// the items answering it are found by reverse lookup on `items.request_id`.
#[derive(Debug, Queryable, Selectable, Clone, PartialEq)]
#[diesel(table_name = crate::schema::requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ItemRequest {
    pub id: i32,
    pub description: String,
    pub requester_id: i32,
    pub created: NaiveDateTime,
}

/// NewItemRequest model for inserting new records
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::requests)]
pub struct NewItemRequest {
    pub description: String,
    pub requester_id: i32,
    pub created: NaiveDateTime,
}
