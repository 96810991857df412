use diesel::prelude::*;
use serde::Deserialize;

/// Item model for reading from database.
///
/// `owner_id` references the listing user; `request_id` optionally points at
/// the item request this listing answers.
#[derive(Debug, Queryable, Selectable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i32,
    pub request_id: Option<i32>,
}

/// NewItem model for inserting new records
#[derive(Debug, Insertable, Deserialize, Clone)]
#[diesel(table_name = crate::schema::items)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i32,
    pub request_id: Option<i32>,
}

/// UpdateItem model for partial updates; `None` fields are left unchanged.
#[derive(Debug, AsChangeset, Deserialize, Clone, Default)]
#[diesel(table_name = crate::schema::items)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}
