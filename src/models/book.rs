//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};

/// Number of digits in a normalized ISBN
pub const ISBN_LEN: usize = 13;

/// Strip spaces and hyphens and check that 13 decimal digits remain.
pub fn normalize_isbn(raw: &str) -> AppResult<String> {
    let isbn: String = raw.chars().filter(|c| *c != '-' && *c != ' ').collect();

    if isbn.len() != ISBN_LEN || !isbn.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::Validation("ISBN must be 13 digits".to_string()));
    }
    Ok(isbn)
}

/// Normalize an ISBN used to look a book up. Malformed values cannot match any
/// stored book, so they are reported as not found.
pub fn isbn_for_lookup(raw: &str) -> AppResult<String> {
    normalize_isbn(raw).map_err(|_| AppError::NotFound(format!("Book with ISBN {} not found", raw)))
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// 13-digit ISBN, no separators
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub category: Option<String>,
    pub publication_year: Option<i32>,
    pub description: Option<String>,
    /// Total copies owned
    pub copies: i32,
    /// Copies currently on the shelf
    pub available: i32,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// Whether `available` lies within `[0, copies]`
    pub fn is_consistent(&self) -> bool {
        (0..=self.copies).contains(&self.available)
    }
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    /// ISBN-13, separators allowed
    pub isbn: String,
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub author: String,
    pub category: Option<String>,
    pub publication_year: Option<i32>,
    pub description: Option<String>,
    /// Total copies owned (default: 1)
    #[validate(range(min = 0))]
    pub copies: Option<i32>,
}

/// Validated book ready to be inserted
#[derive(Debug, Clone)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub category: Option<String>,
    pub publication_year: Option<i32>,
    pub description: Option<String>,
    pub copies: i32,
}

impl TryFrom<CreateBook> for NewBook {
    type Error = AppError;

    fn try_from(data: CreateBook) -> AppResult<Self> {
        let isbn = normalize_isbn(&data.isbn)?;
        data.validate()?;

        Ok(NewBook {
            isbn,
            title: data.title,
            author: data.author,
            category: data.category,
            publication_year: data.publication_year,
            description: data.description,
            copies: data.copies.unwrap_or(1),
        })
    }
}

/// Update book request. Omitted fields keep their current value; an explicit
/// `null` clears `category`, `publication_year` or `description`.
///
/// `available` is written as given and is not re-derived from `copies`; use
/// the strict mode of the update endpoint to reject inconsistent counts.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub author: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub category: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub publication_year: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[validate(range(min = 0))]
    pub copies: Option<i32>,
    pub available: Option<i32>,
}

impl UpdateBook {
    /// Apply the provided fields on top of an existing book
    pub fn apply_to(&self, book: &Book) -> Book {
        Book {
            isbn: book.isbn.clone(),
            title: self.title.clone().unwrap_or_else(|| book.title.clone()),
            author: self.author.clone().unwrap_or_else(|| book.author.clone()),
            category: self.category.clone().unwrap_or_else(|| book.category.clone()),
            publication_year: self.publication_year.unwrap_or(book.publication_year),
            description: self.description.clone().unwrap_or_else(|| book.description.clone()),
            copies: self.copies.unwrap_or(book.copies),
            available: self.available.unwrap_or(book.available),
            created_at: book.created_at,
        }
    }
}

/// Query parameters for book updates
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct UpdateBookQuery {
    /// Reject the update if it would leave `available` outside `[0, copies]`
    pub strict: Option<bool>,
}

/// Query parameters for catalog search
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct SearchQuery {
    /// Substring matched against title, author, ISBN and category
    pub q: Option<String>,
}
