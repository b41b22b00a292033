use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::response::ApiResponse;
use crate::services::vote::{VoteChange, VoteService, VoteValue};
use axum::{response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct VoteRequest {
    #[serde(alias = "postId")]
    pub post_id: i32,
    /// 1 for an upvote, -1 for a downvote
    pub value: i16,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VoteResponse {
    pub post_id: i32,
    pub value: i16,
    pub change: VoteChange,
    pub upvotes: i32,
    pub downvotes: i32,
    pub net_votes: i32,
    /// Reputation of the post's author after this vote
    pub author_reputation: i32,
}

#[utoipa::path(
    post,
    path = "/api/votes",
    security(("jwt_token" = [])),
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Vote recorded", body = VoteResponse),
        (status = 400, description = "Value is not -1 or 1", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 404, description = "Post not found", body = AppError),
    ),
    tag = "votes"
)]
pub async fn cast_vote(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<VoteRequest>,
) -> AppResult<impl IntoResponse> {
    let value = VoteValue::try_from(payload.value)?;

    let outcome = VoteService::new(db)
        .cast_vote(auth_user.user_id, payload.post_id, value)
        .await?;

    Ok(ApiResponse::ok(VoteResponse {
        post_id: outcome.post.id,
        value: outcome.vote.value,
        change: outcome.change,
        upvotes: outcome.post.upvotes,
        downvotes: outcome.post.downvotes,
        net_votes: outcome.post.net_votes(),
        author_reputation: outcome.author_reputation,
    }))
}
