use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use newsroom_db::StoreError;
use newsroom_publish::PublishError;
use newsroom_types::api::MessageResponse;

/// Outcomes of a news operation other than success.
#[derive(Debug, Error)]
pub enum NewsError {
    #[error("Invalid identifier '{0}'")]
    InvalidId(String),

    #[error("{0}")]
    Validation(String),

    #[error("News not found")]
    NotFound,

    #[error("Storage failure: {0}")]
    Storage(StoreError),

    /// The external post could not be created. The item has already been
    /// rolled back when this reaches the caller.
    #[error("Publishing failed: {0}")]
    Publish(#[from] PublishError),
}

impl From<StoreError> for NewsError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidId(id) => NewsError::InvalidId(id),
            other => NewsError::Storage(other),
        }
    }
}

impl NewsError {
    pub fn status(&self) -> StatusCode {
        match self {
            NewsError::InvalidId(_) => StatusCode::BAD_REQUEST,
            NewsError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            NewsError::NotFound => StatusCode::NOT_FOUND,
            NewsError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            NewsError::Publish(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for NewsError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }
        (status, Json(MessageResponse::new(self.to_string()))).into_response()
    }
}
