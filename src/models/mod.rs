//! Data models for the library server

pub mod book;
pub mod loan;

// Re-export commonly used types
pub use book::{isbn_for_lookup, normalize_isbn, Book, CreateBook, NewBook, UpdateBook};
pub use loan::{Loan, LoanDetails, LoanStatus};
