//! Statistics endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::loan::LoanDetails};

/// Statistics response
#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    /// Number of distinct titles
    pub total_books: i64,
    /// Copies owned across the catalog
    pub total_copies: i64,
    /// Copies on the shelf
    pub available_copies: i64,
    /// Copies out on loan (`total_copies - available_copies`)
    pub borrowed_books: i64,
    /// Books per category, most populated first
    pub categories: Vec<CategoryCount>,
    /// Most recent loans
    pub recent_activity: Vec<LoanDetails>,
}

#[derive(Serialize, ToSchema)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Get catalog and circulation statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Library statistics", body = StatsResponse)
    )
)]
pub async fn get_stats(State(state): State<crate::AppState>) -> AppResult<Json<StatsResponse>> {
    let stats = state.services.stats.get_stats().await?;
    Ok(Json(stats))
}
