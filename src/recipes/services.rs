use sqlx::PgPool;
use tracing::debug;

use crate::error::AppError;

use super::{
    dto::{Page, PageRequest},
    filters::SearchFilters,
    repo,
    repo_types::Recipe,
};

/// All recipes, ordered by rating.
pub async fn list_recipes(db: &PgPool, page: PageRequest) -> Result<Page<Recipe>, AppError> {
    search_recipes(db, page, &SearchFilters::default()).await
}

/// Recipes matching `filters`; `total` counts every match, not just this page.
pub async fn search_recipes(
    db: &PgPool,
    page: PageRequest,
    filters: &SearchFilters,
) -> Result<Page<Recipe>, AppError> {
    // Count and page run on one connection, released when `conn` drops.
    let mut conn = db.acquire().await?;
    let total = repo::count_matching(&mut conn, filters).await?;
    let data = repo::fetch_page(&mut conn, filters, &page).await?;
    debug!(total, returned = data.len(), page = page.page, "recipes fetched");

    Ok(Page {
        total,
        page: page.page,
        limit: page.limit,
        data,
    })
}
