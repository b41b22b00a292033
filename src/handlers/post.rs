use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::PostModel;
use crate::response::ApiResponse;
use crate::services::post::PostService;
use axum::{response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    #[serde(alias = "threadId")]
    pub thread_id: i32,
    /// Reply body (1-10000 characters)
    #[validate(length(min = 1, max = 10000))]
    pub content: String,
    /// Earlier post in the same thread this one answers
    #[serde(default, alias = "parentPostId")]
    pub parent_post_id: Option<i32>,
}

#[utoipa::path(
    post,
    path = "/api/posts",
    security(("jwt_token" = [])),
    request_body = CreatePostRequest,
    responses(
        (status = 200, description = "Post created", body = PostModel),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 403, description = "Thread is locked", body = AppError),
        (status = 404, description = "Thread not found", body = AppError),
    ),
    tag = "posts"
)]
pub async fn create_post(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreatePostRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if payload.content.trim().is_empty() {
        return Err(AppError::Validation("Content must not be blank".to_string()));
    }

    let post = PostService::new(db)
        .create(
            auth_user.user_id,
            payload.thread_id,
            payload.parent_post_id,
            &payload.content,
        )
        .await?;

    Ok(ApiResponse::ok(post))
}
