use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use newsroom_db::query::Page;
use newsroom_types::api::{Claims, DeleteResponse, ListParams};
use newsroom_types::models::{NewsInput, NewsItem};

use crate::AppState;
use crate::error::NewsError;

fn listing_args(params: ListParams) -> (Option<String>, Page) {
    let page = Page::parse(params.limit.as_deref(), params.skip.as_deref());
    let text = params.query.filter(|q| !q.is_empty());
    (text, page)
}

/// GET /newsroom
pub async fn list_news(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<NewsItem>>, NewsError> {
    let (text, page) = listing_args(params);
    Ok(Json(state.news.list(text, page).await?))
}

/// GET /newsroom/featured
pub async fn list_featured(State(state): State<AppState>) -> Result<Json<Vec<NewsItem>>, NewsError> {
    Ok(Json(state.news.list_featured().await?))
}

/// GET /newsroom/projects
pub async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<Uuid>>, NewsError> {
    Ok(Json(state.news.list_projects().await?))
}

/// GET /newsroom/project/{id}
pub async fn list_project_news(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<NewsItem>>, NewsError> {
    let (text, page) = listing_args(params);
    Ok(Json(state.news.list_for_project(&project_id, text, page).await?))
}

/// GET /newsroom/{id}
pub async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NewsItem>, NewsError> {
    Ok(Json(state.news.get(&id).await?))
}

/// POST /newsroom: creates and publishes an item.
pub async fn create_news(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<NewsInput>,
) -> Result<impl IntoResponse, NewsError> {
    let item = state.news.create(input).await?;
    info!("News {} created by {}", item.id, claims.sub);
    Ok((StatusCode::CREATED, Json(item)))
}

/// PATCH /newsroom/{id}
pub async fn update_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<NewsInput>,
) -> Result<Json<NewsItem>, NewsError> {
    Ok(Json(state.news.update(&id, input).await?))
}

/// DELETE /newsroom/{id}: removes the item and retracts its post.
pub async fn delete_news(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, NewsError> {
    let outcome = state.news.delete(&id).await?;
    info!("News {} deleted by {}", id, claims.sub);
    Ok(Json(DeleteResponse {
        message: "News deleted".into(),
        retracted: outcome.retracted,
    }))
}

pub async fn health() -> &'static str {
    "ok"
}
