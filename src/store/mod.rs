//! Book storage.
//!
//! The HTTP layer only talks to [`BookRepository`], so the in-memory store can be swapped for
//! a persistent one without touching the routes.

use axum::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

mod id;
pub mod memory;

pub use memory::InMemoryBookStore;

pub type BookId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    #[schema(value_type = u64, example = 1)]
    pub id: BookId,
    #[schema(example = "Rich Dad Poor Dad")]
    pub title: String,
    #[schema(example = "Robert Kiyosaki")]
    pub author: String,
    #[schema(example = 9.99)]
    pub price: f64,
}

/// A book that has not been assigned an id yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub price: f64,
}

impl NewBook {
    fn with_id(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            price: self.price,
        }
    }
}

/// Changes to apply to a stored book. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub price: Option<f64>,
}

impl BookChanges {
    fn merged_into(self, book: &Book) -> Book {
        Book {
            id: book.id,
            title: self.title.unwrap_or_else(|| book.title.clone()),
            author: self.author.unwrap_or_else(|| book.author.clone()),
            price: self.price.unwrap_or(book.price),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookStoreError {
    #[error("Book with id {id} not found")]
    NotFound { id: BookId },
}

#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Returns every stored book in insertion order.
    async fn list(&self) -> Vec<Book>;

    /// Stores a new book under a freshly generated id and returns it.
    async fn create(&self, book: NewBook) -> Book;

    async fn update(&self, id: BookId, changes: BookChanges) -> Result<Book, BookStoreError>;

    /// Removes every book with the given id and returns how many were removed.
    async fn delete(&self, id: BookId) -> usize;
}
