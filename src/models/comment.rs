use chrono::NaiveDateTime;
use diesel::prelude::*;

/// Comment model for reading from database.
///
/// Free-text feedback on an item, creatable only by a user with a finished
/// approved booking of that item. Immutable once created.
#[derive(Debug, Queryable, Selectable, Clone, PartialEq)]
#[diesel(table_name = crate::schema::comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Comment {
    pub id: i32,
    pub text: String,
    pub item_id: i32,
    pub author_id: i32,
    pub created: NaiveDateTime,
}

/// NewComment model for inserting new records
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment {
    pub text: String,
    pub item_id: i32,
    pub author_id: i32,
    pub created: NaiveDateTime,
}
