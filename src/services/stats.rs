//! Statistics service

use crate::{
    api::stats::{CategoryCount, StatsResponse},
    error::AppResult,
    models::loan::LoanDetails,
    repository::{books::CatalogTotals, Repository},
};

/// Number of loans reported as recent activity
pub const RECENT_ACTIVITY_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Catalog and circulation summary
    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        let totals = self.repository.books.totals().await?;
        let categories = self.repository.books.category_counts().await?;
        let recent = self
            .repository
            .loans
            .history(Some(RECENT_ACTIVITY_LIMIT))
            .await?;

        Ok(build_stats(totals, categories, recent))
    }
}

/// Assemble the stats payload. Copies on loan are derived from the totals.
pub fn build_stats(
    totals: CatalogTotals,
    categories: Vec<(String, i64)>,
    recent_activity: Vec<LoanDetails>,
) -> StatsResponse {
    StatsResponse {
        total_books: totals.total_books,
        total_copies: totals.total_copies,
        available_copies: totals.available_copies,
        borrowed_books: totals.total_copies - totals.available_copies,
        categories: categories
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect(),
        recent_activity,
    }
}
