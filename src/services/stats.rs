use crate::{
    error::AppResult,
    models::{Post, Thread, User},
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ForumStats {
    pub total_threads: u64,
    pub total_posts: u64,
    pub total_users: u64,
}

pub async fn forum_stats(db: &DatabaseConnection) -> AppResult<ForumStats> {
    Ok(ForumStats {
        total_threads: Thread::find().count(db).await?,
        total_posts: Post::find().count(db).await?,
        total_users: User::find().count(db).await?,
    })
}
