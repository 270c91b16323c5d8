pub mod error;
pub mod middleware;
pub mod news;
pub mod projector;
pub mod service;
pub mod validate;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::service::NewsService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub news: NewsService,
    pub jwt_secret: String,
}

/// All newsroom routes. Write routes sit behind the admin gate.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/newsroom", get(news::list_news))
        .route("/newsroom/featured", get(news::list_featured))
        .route("/newsroom/projects", get(news::list_projects))
        .route("/newsroom/project/{id}", get(news::list_project_news))
        .route("/newsroom/{id}", get(news::get_news))
        .route("/health", get(news::health));

    let admin_routes = Router::new()
        .route("/newsroom", post(news::create_news))
        .route("/newsroom/{id}", patch(news::update_news).delete(news::delete_news))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(state)
}
