use axum::async_trait;
use tokio::sync::RwLock;

use super::{id::MonotonicIds, Book, BookChanges, BookId, BookRepository, BookStoreError, NewBook};

/// Books in insertion order.
#[derive(Debug, Default)]
struct Books {
    records: Vec<Book>,
}

impl Books {
    fn append(&mut self, book: Book) {
        self.records.push(book);
    }

    fn find_index(&self, id: BookId) -> Option<usize> {
        self.records.iter().position(|book| book.id == id)
    }

    fn replace_at(&mut self, index: usize, book: Book) {
        self.records[index] = book;
    }

    fn remove_where(&mut self, id: BookId) -> usize {
        let before = self.records.len();
        self.records.retain(|book| book.id != id);

        before - self.records.len()
    }

    fn max_id(&self) -> BookId {
        self.records.iter().map(|book| book.id).max().unwrap_or(0)
    }
}

#[derive(Debug)]
struct Holder {
    books: Books,
    ids: MonotonicIds,
}

/// A [`BookRepository`] that lives in process memory and is lost on restart.
///
/// Every operation takes the lock once, so concurrent requests are serialized.
#[derive(Debug)]
pub struct InMemoryBookStore {
    holder: RwLock<Holder>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::with_books(Vec::new())
    }

    /// A store holding the two books the inventory starts with.
    pub fn seeded() -> Self {
        Self::with_books(vec![
            Book {
                id: 1,
                title: "Rich Dad Poor Dad".to_string(),
                author: "Robert Kiyosaki".to_string(),
                price: 9.99,
            },
            Book {
                id: 2,
                title: "The Intelligent Investor".to_string(),
                author: "Benjamin Graham".to_string(),
                price: 14.99,
            },
        ])
    }

    pub fn with_books(records: Vec<Book>) -> Self {
        let books = Books { records };
        let ids = MonotonicIds::starting_after(books.max_id());

        Self {
            holder: RwLock::new(Holder { books, ids }),
        }
    }
}

impl Default for InMemoryBookStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookStore {
    async fn list(&self) -> Vec<Book> {
        self.holder.read().await.books.records.clone()
    }

    #[tracing::instrument(skip_all)]
    async fn create(&self, book: NewBook) -> Book {
        let mut holder = self.holder.write().await;

        let book = book.with_id(holder.ids.next());
        holder.books.append(book.clone());

        tracing::debug!(id = book.id, "Book created");

        book
    }

    #[tracing::instrument(skip(self, changes))]
    async fn update(&self, id: BookId, changes: BookChanges) -> Result<Book, BookStoreError> {
        let mut holder = self.holder.write().await;

        let index = holder
            .books
            .find_index(id)
            .ok_or(BookStoreError::NotFound { id })?;

        let book = changes.merged_into(&holder.books.records[index]);
        holder.books.replace_at(index, book.clone());

        tracing::debug!("Book updated");

        Ok(book)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: BookId) -> usize {
        let removed = self.holder.write().await.books.remove_where(id);

        tracing::debug!(removed, "Books deleted");

        removed
    }
}
