use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::ThreadModel;
use crate::response::ApiResponse;
use crate::services::post::PostService;
use crate::services::reply_tree::ReplyTreeNode;
use crate::services::thread::{NewThread, ThreadService, ThreadView};
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateThreadRequest {
    /// Thread title (1-200 characters)
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(alias = "categoryId")]
    pub category_id: i32,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default, alias = "isPinned")]
    pub is_pinned: bool,
    #[serde(default, alias = "isLocked")]
    pub is_locked: bool,
}

#[utoipa::path(
    get,
    path = "/api/threads/recent",
    responses(
        (status = 200, description = "Ten most recently created threads", body = Vec<ThreadView>),
    ),
    tag = "threads"
)]
pub async fn recent_threads(
    Extension(db): Extension<DatabaseConnection>,
) -> AppResult<impl IntoResponse> {
    let threads = ThreadService::new(db).recent().await?;
    Ok(ApiResponse::ok(threads))
}

#[utoipa::path(
    get,
    path = "/api/threads/{id}",
    params(("id" = i32, Path, description = "Thread ID")),
    responses(
        (status = 200, description = "Thread with author and category; counts a view", body = ThreadView),
        (status = 404, description = "Thread not found", body = AppError),
    ),
    tag = "threads"
)]
pub async fn get_thread(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let thread = ThreadService::new(db).view(id).await?;
    Ok(ApiResponse::ok(thread))
}

#[utoipa::path(
    post,
    path = "/api/threads",
    security(("jwt_token" = [])),
    request_body = CreateThreadRequest,
    responses(
        (status = 200, description = "Thread created", body = ThreadModel),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 404, description = "Category not found", body = AppError),
    ),
    tag = "threads"
)]
pub async fn create_thread(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateThreadRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if payload.title.trim().is_empty() || payload.content.trim().is_empty() {
        return Err(AppError::Validation(
            "Title and content must not be blank".to_string(),
        ));
    }

    let thread = ThreadService::new(db)
        .create(
            auth_user.user_id,
            NewThread {
                category_id: payload.category_id,
                title: payload.title,
                content: payload.content,
                is_pinned: payload.is_pinned,
                is_locked: payload.is_locked,
            },
        )
        .await?;

    Ok(ApiResponse::ok(thread))
}

#[utoipa::path(
    get,
    path = "/api/threads/{id}/posts",
    params(("id" = i32, Path, description = "Thread ID")),
    responses(
        (status = 200, description = "Reply tree, annotated with the caller's votes", body = Vec<ReplyTreeNode>),
        (status = 404, description = "Thread not found", body = AppError),
    ),
    tag = "threads"
)]
pub async fn thread_posts(
    Extension(db): Extension<DatabaseConnection>,
    viewer: Option<AuthUser>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let tree = PostService::new(db)
        .reply_tree(id, viewer.map(|v| v.user_id))
        .await?;
    Ok(ApiResponse::ok(tree))
}
