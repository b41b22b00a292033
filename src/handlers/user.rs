use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;
use crate::services::user::{UserProfile, UserService};
use axum::{extract::Path, response::IntoResponse, Extension};
use sea_orm::DatabaseConnection;

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User with their 20 latest threads and posts", body = UserProfile),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "users"
)]
pub async fn get_user(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let profile = UserService::new(db).profile(id).await?;
    Ok(ApiResponse::ok(profile))
}
