use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::CategoryModel;
use crate::response::ApiResponse;
use crate::services::category::{CategoryService, CategoryWithStats, NewCategory};
use crate::services::thread::{ThreadService, ThreadView};
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    /// Category name (1-100 characters)
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Category description (max 500 characters)
    #[validate(length(max = 500))]
    #[serde(default)]
    pub description: String,
    /// Icon name, defaults to "folder"
    #[validate(length(max = 50))]
    pub icon: Option<String>,
    /// Display sort order
    #[serde(default, alias = "order")]
    pub sort_order: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories with thread/post totals and latest thread", body = Vec<CategoryWithStats>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    Extension(db): Extension<DatabaseConnection>,
) -> AppResult<impl IntoResponse> {
    let categories = CategoryService::new(db).list_with_stats().await?;
    Ok(ApiResponse::ok(categories))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = CategoryModel),
        (status = 404, description = "Category not found", body = AppError),
    ),
    tag = "categories"
)]
pub async fn get_category(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryService::new(db).get_by_id(id).await?;
    Ok(ApiResponse::ok(category))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    security(("jwt_token" = [])),
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = CategoryModel),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "categories"
)]
pub async fn create_category(
    Extension(db): Extension<DatabaseConnection>,
    _auth_user: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = CategoryService::new(db)
        .create(NewCategory {
            name: payload.name,
            description: payload.description,
            icon: payload.icon,
            sort_order: payload.sort_order.unwrap_or(0),
        })
        .await?;

    Ok(ApiResponse::ok(category))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}/threads",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Threads, pinned first then by latest activity", body = Vec<ThreadView>),
        (status = 404, description = "Category not found", body = AppError),
    ),
    tag = "categories"
)]
pub async fn list_category_threads(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let threads = ThreadService::new(db).list_by_category(id).await?;
    Ok(ApiResponse::ok(threads))
}
