//! Loans repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, LoanDetails, LoanStatus},
};

const LOAN_COLUMNS: &str = "id, isbn, borrower_name, borrower_email, borrow_date, return_date, status";

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Loans joined with their book, most recent first. `None` returns every loan.
    pub async fn history(&self, limit: Option<i64>) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(
            r#"
            SELECT l.id, l.isbn, l.borrower_name, l.borrower_email, l.borrow_date,
                   l.return_date, l.status, b.title, b.author
            FROM loans l
            LEFT JOIN books b ON b.isbn = l.isbn
            ORDER BY l.borrow_date DESC, l.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// Count open loans referencing a book
    pub async fn count_open_for_isbn(&self, isbn: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE isbn = $1 AND status = $2",
        )
        .bind(isbn)
        .bind(LoanStatus::Borrowed.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    // =========================================================================
    // TRANSACTIONAL (called with a connection borrowed from an open transaction)
    // =========================================================================

    /// Most recent open loan for a borrower, locked until the transaction ends
    pub async fn find_open_for_update(
        conn: &mut PgConnection,
        isbn: &str,
        borrower_name: &str,
    ) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(&format!(
            r#"
            SELECT {} FROM loans
            WHERE isbn = $1 AND borrower_name = $2 AND status = $3
            ORDER BY borrow_date DESC, id DESC
            LIMIT 1
            FOR UPDATE
            "#,
            LOAN_COLUMNS
        ))
        .bind(isbn)
        .bind(borrower_name)
        .bind(LoanStatus::Borrowed.as_str())
        .fetch_optional(&mut *conn)
        .await?;
        Ok(loan)
    }

    /// Insert an open loan dated now
    pub async fn insert_open(
        conn: &mut PgConnection,
        isbn: &str,
        borrower_name: &str,
        borrower_email: Option<&str>,
    ) -> AppResult<Loan> {
        let result = sqlx::query_as::<_, Loan>(&format!(
            r#"
            INSERT INTO loans (isbn, borrower_name, borrower_email, borrow_date, status)
            VALUES ($1, $2, $3, NOW(), $4)
            RETURNING {}
            "#,
            LOAN_COLUMNS
        ))
        .bind(isbn)
        .bind(borrower_name)
        .bind(borrower_email)
        .bind(LoanStatus::Borrowed.as_str())
        .fetch_one(&mut *conn)
        .await;

        result.map_err(|e| match AppError::from(e) {
            err if err.is_unique_violation() => AppError::AlreadyBorrowed(format!(
                "{} already has an open loan for this book",
                borrower_name
            )),
            err => err,
        })
    }

    /// Close an open loan
    pub async fn mark_returned(conn: &mut PgConnection, loan_id: i32) -> AppResult<Loan> {
        let loan = sqlx::query_as::<_, Loan>(&format!(
            r#"
            UPDATE loans SET return_date = NOW(), status = $2
            WHERE id = $1 AND status = $3
            RETURNING {}
            "#,
            LOAN_COLUMNS
        ))
        .bind(loan_id)
        .bind(LoanStatus::Returned.as_str())
        .bind(LoanStatus::Borrowed.as_str())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NoActiveLoan(format!("Loan {} is not open", loan_id)))?;
        Ok(loan)
    }
}
