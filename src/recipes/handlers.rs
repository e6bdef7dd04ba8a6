use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{error, instrument, warn};

use crate::{error::AppError, state::AppState};

use super::{
    dto::{ListParams, Page, SearchParams},
    repo_types::Recipe,
    services,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/recipes", get(list_recipes))
        .route("/api/recipes/search", get(search_recipes))
}

/// GET /api/recipes?page=&limit=&sort=
#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Page<Recipe>>, AppError> {
    let Query(params) = params.map_err(rejected)?;
    let page = params.validate().map_err(invalid)?;

    let envelope = services::list_recipes(&state.db, page).await.map_err(|e| {
        error!(error = %e, "list_recipes failed");
        e
    })?;
    Ok(Json(envelope))
}

/// GET /api/recipes/search?page=&limit=&calories_min=&...
#[instrument(skip(state))]
pub async fn search_recipes(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Page<Recipe>>, AppError> {
    let Query(params) = params.map_err(rejected)?;
    let (page, filters) = params.validate().map_err(invalid)?;

    let envelope = services::search_recipes(&state.db, page, &filters)
        .await
        .map_err(|e| {
            error!(error = %e, ?filters, "search_recipes failed");
            e
        })?;
    Ok(Json(envelope))
}

fn rejected(rejection: QueryRejection) -> AppError {
    warn!(error = %rejection.body_text(), "invalid query string");
    AppError::from(rejection)
}

fn invalid(err: AppError) -> AppError {
    warn!(error = %err, "invalid pagination or filter");
    err
}
