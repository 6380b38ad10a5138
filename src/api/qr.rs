//! QR code endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

#[derive(Serialize, ToSchema)]
pub struct BookQrResponse {
    pub isbn: String,
    pub title: String,
    /// `data:` URI of the QR image
    pub qr_code: String,
}

#[derive(Serialize, ToSchema)]
pub struct FrontendQrResponse {
    pub url: String,
    /// `data:` URI of the QR image
    pub qr_code: String,
    pub message: String,
}

/// QR code for a book's ISBN
#[utoipa::path(
    get,
    path = "/books/{isbn}/qr",
    tag = "qr",
    params(("isbn" = String, Path, description = "ISBN-13, separators allowed")),
    responses(
        (status = 200, description = "QR code", body = BookQrResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book_qr(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<BookQrResponse>> {
    let qr = state.services.qr.book_qr(&isbn).await?;
    Ok(Json(qr))
}

/// QR code linking to the web frontend
#[utoipa::path(
    get,
    path = "/frontend-qr",
    tag = "qr",
    responses(
        (status = 200, description = "QR code", body = FrontendQrResponse)
    )
)]
pub async fn get_frontend_qr(
    State(state): State<crate::AppState>,
) -> AppResult<Json<FrontendQrResponse>> {
    let qr = state.services.qr.frontend_qr()?;
    Ok(Json(qr))
}
