//! Catalog management service

use crate::{
    error::{AppError, AppResult},
    models::book::{isbn_for_lookup, Book, CreateBook, NewBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a new book. Every copy starts out available.
    pub async fn add_book(&self, data: CreateBook) -> AppResult<Book> {
        let new_book = NewBook::try_from(data)?;

        if self.repository.books.exists(&new_book.isbn).await? {
            return Err(AppError::Duplicate(
                "Book with this ISBN already exists".to_string(),
            ));
        }

        let book = self.repository.books.create(&new_book).await?;
        tracing::info!(isbn = %book.isbn, copies = book.copies, "Book added to catalog");
        Ok(book)
    }

    /// Get a book by ISBN (separators allowed)
    pub async fn get_book(&self, isbn: &str) -> AppResult<Book> {
        let isbn = isbn_for_lookup(isbn)?;
        self.repository.books.get_by_isbn(&isbn).await
    }

    /// All books ordered by title
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Overwrite the provided fields of a book.
    ///
    /// In permissive mode `available` is written as given even if it ends up
    /// outside `[0, copies]`. With `strict`, such an update is rejected.
    pub async fn update_book(&self, isbn: &str, data: &UpdateBook, strict: bool) -> AppResult<Book> {
        let isbn = isbn_for_lookup(isbn)?;
        validator::Validate::validate(data)?;

        let current = self.repository.books.get_by_isbn(&isbn).await?;
        let updated = data.apply_to(&current);

        if !updated.is_consistent() {
            if strict {
                return Err(AppError::Validation(format!(
                    "available ({}) must be between 0 and copies ({})",
                    updated.available, updated.copies
                )));
            }
            tracing::warn!(
                isbn = %isbn,
                copies = updated.copies,
                available = updated.available,
                "Book update leaves available copies out of range"
            );
        }

        self.repository.books.update(&updated).await
    }

    /// Delete a book. Open loans on it are kept and left pointing at the removed ISBN.
    pub async fn delete_book(&self, isbn: &str) -> AppResult<()> {
        let isbn = isbn_for_lookup(isbn)?;
        let open_loans = self.repository.loans.count_open_for_isbn(&isbn).await?;

        self.repository.books.delete(&isbn).await?;

        if open_loans > 0 {
            tracing::warn!(isbn = %isbn, open_loans, "Deleted book still has open loans");
        }
        tracing::info!(isbn = %isbn, "Book removed from catalog");
        Ok(())
    }

    /// Case-insensitive substring search over title, author, ISBN and category
    pub async fn search(&self, query: &str) -> AppResult<Vec<Book>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::Validation("Search query is required".to_string()));
        }
        self.repository.books.search(query).await
    }
}
