//! QR code links for books and the web frontend

use base64::{engine::general_purpose::STANDARD, Engine as _};
use qrcode::{render::svg, EcLevel, QrCode};

use crate::{
    api::qr::{BookQrResponse, FrontendQrResponse},
    error::{AppError, AppResult},
    models::book::isbn_for_lookup,
    repository::Repository,
};

const QR_MIN_DIMENSION: u32 = 200;

/// Render `text` as a QR code image (SVG document bytes)
pub fn encode_as_image(text: &str) -> AppResult<Vec<u8>> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::L)
        .map_err(|e| AppError::Internal(format!("QR encoding failed: {}", e)))?;

    let image = code
        .render::<svg::Color>()
        .min_dimensions(QR_MIN_DIMENSION, QR_MIN_DIMENSION)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();

    Ok(image.into_bytes())
}

/// Wrap an encoded image into a `data:` URI suitable for an `<img src>`
pub fn to_data_uri(image: &[u8]) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(image))
}

#[derive(Clone)]
pub struct QrService {
    repository: Repository,
    public_url: String,
}

impl QrService {
    pub fn new(repository: Repository, public_url: String) -> Self {
        Self {
            repository,
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    /// QR code encoding a book's ISBN
    pub async fn book_qr(&self, isbn: &str) -> AppResult<BookQrResponse> {
        let isbn = isbn_for_lookup(isbn)?;
        let book = self.repository.books.get_by_isbn(&isbn).await?;

        Ok(BookQrResponse {
            qr_code: to_data_uri(&encode_as_image(&book.isbn)?),
            isbn: book.isbn,
            title: book.title,
        })
    }

    /// QR code pointing at the web frontend
    pub fn frontend_qr(&self) -> AppResult<FrontendQrResponse> {
        let url = format!("{}/frontend", self.public_url);

        Ok(FrontendQrResponse {
            qr_code: to_data_uri(&encode_as_image(&url)?),
            url,
            message: "QR code for frontend access".to_string(),
        })
    }
}
