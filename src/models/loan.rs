//! Loan (borrow) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use utoipa::ToSchema;
use validator::Validate;

/// Loan lifecycle: `borrowed` then `returned` (terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Borrowed,
    Returned,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Borrowed => "borrowed",
            LoanStatus::Returned => "returned",
        }
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "borrowed" => Ok(LoanStatus::Borrowed),
            "returned" => Ok(LoanStatus::Returned),
            other => Err(format!("unknown loan status '{}'", other)),
        }
    }
}

fn decode_status(row: &PgRow) -> Result<LoanStatus, sqlx::Error> {
    let raw: String = row.try_get("status")?;
    raw.parse().map_err(|e: String| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: e.into(),
    })
}

/// Loan record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub isbn: String,
    pub borrower_name: String,
    pub borrower_email: Option<String>,
    pub borrow_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
}

impl<'r> FromRow<'r, PgRow> for Loan {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Loan {
            id: row.try_get("id")?,
            isbn: row.try_get("isbn")?,
            borrower_name: row.try_get("borrower_name")?,
            borrower_email: row.try_get("borrower_email")?,
            borrow_date: row.try_get("borrow_date")?,
            return_date: row.try_get("return_date")?,
            status: decode_status(row)?,
        })
    }
}

/// Loan joined with the borrowed book's title and author.
///
/// Title and author are null when the book was deleted while the loan existed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDetails {
    pub id: i32,
    pub isbn: String,
    pub borrower_name: String,
    pub borrower_email: Option<String>,
    pub borrow_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    pub title: Option<String>,
    pub author: Option<String>,
}

impl<'r> FromRow<'r, PgRow> for LoanDetails {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let loan = Loan::from_row(row)?;
        Ok(LoanDetails {
            id: loan.id,
            isbn: loan.isbn,
            borrower_name: loan.borrower_name,
            borrower_email: loan.borrower_email,
            borrow_date: loan.borrow_date,
            return_date: loan.return_date,
            status: loan.status,
            title: row.try_get("title")?,
            author: row.try_get("author")?,
        })
    }
}

/// Borrow request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BorrowRequest {
    pub borrower_name: Option<String>,
    #[validate(email)]
    pub borrower_email: Option<String>,
}

/// Return request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReturnRequest {
    pub borrower_name: Option<String>,
}
