//! Borrow and return endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::AppJson,
    error::AppResult,
    models::loan::{BorrowRequest, Loan, LoanDetails, ReturnRequest},
};

/// Borrow a copy of a book
#[utoipa::path(
    post,
    path = "/books/{isbn}/borrow",
    tag = "loans",
    params(("isbn" = String, Path, description = "ISBN-13, separators allowed")),
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Loan opened", body = Loan),
        (status = 400, description = "Borrower name missing", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "No copy available or borrower already holds one", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
    AppJson(request): AppJson<BorrowRequest>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    let loan = state.services.circulation.borrow(&isbn, &request).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// Return a borrowed copy
#[utoipa::path(
    post,
    path = "/books/{isbn}/return",
    tag = "loans",
    params(("isbn" = String, Path, description = "ISBN-13, separators allowed")),
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Loan closed", body = Loan),
        (status = 400, description = "Borrower name missing", body = crate::error::ErrorResponse),
        (status = 404, description = "Book or open loan not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
    AppJson(request): AppJson<ReturnRequest>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.circulation.return_book(&isbn, &request).await?;
    Ok(Json(loan))
}

/// Full borrow history, most recent first
#[utoipa::path(
    get,
    path = "/borrow-history",
    tag = "loans",
    responses(
        (status = 200, description = "Loans with book title and author", body = Vec<LoanDetails>)
    )
)]
pub async fn borrow_history(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let history = state.services.circulation.history().await?;
    Ok(Json(history))
}
