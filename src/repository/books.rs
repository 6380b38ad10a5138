//! Books repository for database operations

use sqlx::{PgConnection, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, NewBook},
};

const BOOK_COLUMNS: &str = "isbn, title, author, category, publication_year, description, \
                            copies, available, created_at";

/// Escape LIKE wildcards so the query matches as a literal substring
pub fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Aggregate copy counts over the whole catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogTotals {
    pub total_books: i64,
    pub total_copies: i64,
    pub available_copies: i64,
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by normalized ISBN
    pub async fn get_by_isbn(&self, isbn: &str) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books WHERE isbn = $1", BOOK_COLUMNS))
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", isbn)))
    }

    /// Whether a book with this ISBN exists
    pub async fn exists(&self, isbn: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
            .bind(isbn)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// List all books by title (byte order), then insertion order
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            r#"SELECT {} FROM books ORDER BY title COLLATE "C", seq"#,
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Case-insensitive substring search over title, author, ISBN and category
    pub async fn search(&self, query: &str) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT {} FROM books
            WHERE title ILIKE $1 OR author ILIKE $1 OR isbn ILIKE $1 OR category ILIKE $1
            ORDER BY title COLLATE "C", seq
            "#,
            BOOK_COLUMNS
        ))
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Insert a new book with every copy available
    pub async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let result = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (isbn, title, author, category, publication_year, description, copies, available)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.category)
        .bind(book.publication_year)
        .bind(&book.description)
        .bind(book.copies)
        .fetch_one(&self.pool)
        .await;

        result.map_err(|e| match AppError::from(e) {
            err if err.is_unique_violation() => {
                AppError::Duplicate("Book with this ISBN already exists".to_string())
            }
            err => err,
        })
    }

    /// Overwrite every mutable field of a book
    pub async fn update(&self, book: &Book) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $2, author = $3, category = $4, publication_year = $5,
                description = $6, copies = $7, available = $8
            WHERE isbn = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.category)
        .bind(book.publication_year)
        .bind(&book.description)
        .bind(book.copies)
        .bind(book.available)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", book.isbn)))
    }

    /// Delete a book
    pub async fn delete(&self, isbn: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = $1")
            .bind(isbn)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with ISBN {} not found", isbn)));
        }
        Ok(())
    }

    /// Book count and copy totals
    pub async fn totals(&self) -> AppResult<CatalogTotals> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*)::bigint AS total_books,
                   COALESCE(SUM(copies), 0)::bigint AS total_copies,
                   COALESCE(SUM(available), 0)::bigint AS available_copies
            FROM books
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(CatalogTotals {
            total_books: row.get("total_books"),
            total_copies: row.get("total_copies"),
            available_copies: row.get("available_copies"),
        })
    }

    /// Number of books per category, most populated first
    pub async fn category_counts(&self) -> AppResult<Vec<(String, i64)>> {
        let rows = sqlx::query(
            r#"
            SELECT category, COUNT(*)::bigint AS count
            FROM books
            WHERE category IS NOT NULL
            GROUP BY category
            ORDER BY count DESC, category
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| (r.get("category"), r.get("count")))
            .collect())
    }

    /// Insert a book with an explicit available count unless its ISBN exists.
    /// Returns whether a row was inserted.
    pub async fn insert_if_absent(&self, book: &NewBook, available: i32) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO books (isbn, title, author, category, publication_year, description, copies, available)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (isbn) DO NOTHING
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.category)
        .bind(book.publication_year)
        .bind(&book.description)
        .bind(book.copies)
        .bind(available)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // TRANSACTIONAL (called with a connection borrowed from an open transaction)
    // =========================================================================

    /// Load a book and hold its row lock until the transaction ends
    pub async fn lock_for_update(conn: &mut PgConnection, isbn: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE isbn = $1 FOR UPDATE",
            BOOK_COLUMNS
        ))
        .bind(isbn)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(book)
    }

    /// Set the available count of a locked book
    pub async fn set_available(conn: &mut PgConnection, isbn: &str, available: i32) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET available = $2 WHERE isbn = $1 RETURNING {}",
            BOOK_COLUMNS
        ))
        .bind(isbn)
        .bind(available)
        .fetch_one(&mut *conn)
        .await?;
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_query() {
        assert_eq!(like_pattern("Clean"), "%Clean%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("C:\\"), "%C:\\\\%");
    }
}
