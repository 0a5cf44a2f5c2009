//! `/books`: list, create, update and delete books.
//!
//! Update and delete take the id from the JSON body. Any JSON number is accepted as an id,
//! one that can not name a stored book simply matches nothing.

use serde_json::{Number, Value};

use crate::store::BookId;

pub mod app;
pub mod create_book;
pub mod delete_book;
pub mod list_books;
pub mod update_book;

/// The `id` the client sent, if it is a JSON number.
fn requested_id(id: Option<&Value>) -> Option<Number> {
    match id {
        Some(Value::Number(id)) => Some(id.clone()),
        _ => None,
    }
}

fn book_id(id: &Number) -> Option<BookId> {
    id.as_u64().or_else(|| {
        id.as_f64()
            .filter(|id| id.fract() == 0.0 && *id >= 0.0 && *id < BookId::MAX as f64)
            .map(|id| id as BookId)
    })
}
