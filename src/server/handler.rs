// HTTP request handlers.
// Query validation and error-to-response mapping for the repository route.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use crate::error::RepoCardError;
use crate::resolver::{CachedResolver, Resolved};

/// Query string of the repository endpoint.
#[derive(Debug, Deserialize)]
pub struct RepoQuery {
    pub repo: Option<String>,
}

/// Error body returned to API consumers.
pub struct ApiError(pub RepoCardError);

impl From<RepoCardError> for ApiError {
    fn from(err: RepoCardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        } else {
            warn!(error = %self.0, status = status.as_u16(), "Request rejected");
        }

        let body = Json(json!({
            "statusCode": status.as_u16(),
            "statusMessage": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Health check endpoint.
pub async fn handle_health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// `GET /api/github?repo=owner/name`
pub async fn handle_repo(
    State(resolver): State<CachedResolver>,
    Query(query): Query<RepoQuery>,
) -> Result<Json<Resolved>, ApiError> {
    let repo = match query.repo.as_deref().map(str::trim) {
        Some(repo) if !repo.is_empty() => repo,
        _ => return Err(RepoCardError::MissingRepo.into()),
    };

    let resolved = resolver.resolve(repo).await?;
    Ok(Json(resolved))
}
