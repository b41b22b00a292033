use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::services::stats::{forum_stats, ForumStats};
use axum::{response::IntoResponse, Extension};
use sea_orm::DatabaseConnection;

#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Forum-wide totals", body = ForumStats),
    ),
    tag = "stats"
)]
pub async fn get_stats(Extension(db): Extension<DatabaseConnection>) -> AppResult<impl IntoResponse> {
    Ok(ApiResponse::ok(forum_stats(&db).await?))
}
