//! Circulation service: borrow and return.
//!
//! Each operation runs in one transaction that locks the book row first, so
//! concurrent borrows and returns of the same title are serialized and the
//! loan write and the available-count write commit together. A transaction
//! dropped before `commit` (e.g. when the client disconnects and the handler
//! future is cancelled) is rolled back.

use crate::{
    error::{AppError, AppResult},
    models::{
        book::isbn_for_lookup,
        loan::{BorrowRequest, Loan, LoanDetails, ReturnRequest},
    },
    repository::{books::BooksRepository, loans::LoansRepository, Repository},
};

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
}

fn required_borrower(name: Option<&str>) -> AppResult<&str> {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(AppError::Validation("Borrower name is required".to_string())),
    }
}

/// Available count after a copy comes back. Never raised above `copies`.
pub fn available_after_return(available: i32, copies: i32) -> i32 {
    if available < copies {
        available + 1
    } else {
        available
    }
}

impl CirculationService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Lend one copy of a book
    pub async fn borrow(&self, isbn: &str, request: &BorrowRequest) -> AppResult<Loan> {
        let borrower_name = required_borrower(request.borrower_name.as_deref())?;
        let borrower_email = request
            .borrower_email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty());
        let request = BorrowRequest {
            borrower_name: Some(borrower_name.to_string()),
            borrower_email: borrower_email.map(str::to_string),
        };
        validator::Validate::validate(&request)?;
        let isbn = isbn_for_lookup(isbn)?;

        let mut tx = self.repository.pool.begin().await?;

        let book = BooksRepository::lock_for_update(&mut tx, &isbn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", isbn)))?;

        if book.available <= 0 {
            return Err(AppError::Unavailable(
                "Book not available for borrowing".to_string(),
            ));
        }

        if LoansRepository::find_open_for_update(&mut tx, &isbn, borrower_name)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyBorrowed(format!(
                "{} already has an open loan for this book",
                borrower_name
            )));
        }

        let loan = LoansRepository::insert_open(&mut tx, &isbn, borrower_name, borrower_email).await?;
        let book = BooksRepository::set_available(&mut tx, &isbn, book.available - 1).await?;

        tx.commit().await?;

        tracing::info!(
            loan_id = loan.id,
            isbn = %isbn,
            available = book.available,
            "Book borrowed"
        );
        Ok(loan)
    }

    /// Close the borrower's most recent open loan of a book
    pub async fn return_book(&self, isbn: &str, request: &ReturnRequest) -> AppResult<Loan> {
        let borrower_name = required_borrower(request.borrower_name.as_deref())?;
        let isbn = isbn_for_lookup(isbn)?;

        let mut tx = self.repository.pool.begin().await?;

        let book = BooksRepository::lock_for_update(&mut tx, &isbn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", isbn)))?;

        let open = LoansRepository::find_open_for_update(&mut tx, &isbn, borrower_name)
            .await?
            .ok_or_else(|| AppError::NoActiveLoan("No active borrow record found".to_string()))?;

        let loan = LoansRepository::mark_returned(&mut tx, open.id).await?;

        let available = available_after_return(book.available, book.copies);
        if available == book.available {
            tracing::warn!(
                isbn = %isbn,
                copies = book.copies,
                available = book.available,
                "Returned copy would exceed owned copies; available count left unchanged"
            );
        }
        let book = BooksRepository::set_available(&mut tx, &isbn, available).await?;

        tx.commit().await?;

        tracing::info!(
            loan_id = loan.id,
            isbn = %isbn,
            available = book.available,
            "Book returned"
        );
        Ok(loan)
    }

    /// Every loan with its book's title and author, most recent first
    pub async fn history(&self) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.history(None).await
    }
}
