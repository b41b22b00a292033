use crate::{
    error::{AppError, AppResult},
    models::{
        post, thread, user, Category, CategoryModel, Post, PostModel, Thread, ThreadModel, User,
        UserModel,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Serialize;
use utoipa::ToSchema;

const PROFILE_ACTIVITY_LIMIT: u64 = 20;

/// Public slice of a user shown next to their threads and posts.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AuthorSummary {
    pub id: i32,
    pub username: String,
    pub reputation: i32,
    pub rank: String,
    pub post_count: i32,
    pub thread_count: i32,
    pub joined_at: chrono::NaiveDateTime,
}

impl From<&UserModel> for AuthorSummary {
    fn from(u: &UserModel) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            reputation: u.reputation,
            rank: u.rank.clone(),
            post_count: u.post_count,
            thread_count: u.thread_count,
            joined_at: u.joined_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileThread {
    #[serde(flatten)]
    pub thread: ThreadModel,
    pub category: Option<CategoryModel>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfilePost {
    #[serde(flatten)]
    pub post: PostModel,
    pub net_votes: i32,
    pub thread_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    pub user: UserModel,
    pub threads: Vec<ProfileThread>,
    pub posts: Vec<ProfilePost>,
}

pub struct UserService {
    db: DatabaseConnection,
}

impl UserService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<UserModel> {
        User::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    /// The user with their latest threads and posts, newest first.
    pub async fn profile(&self, id: i32) -> AppResult<UserProfile> {
        let user = self.get_by_id(id).await?;

        let threads = Thread::find()
            .filter(thread::Column::AuthorId.eq(id))
            .order_by_desc(thread::Column::CreatedAt)
            .order_by_desc(thread::Column::Id)
            .limit(PROFILE_ACTIVITY_LIMIT)
            .find_also_related(Category)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(thread, category)| ProfileThread { thread, category })
            .collect();

        let posts = Post::find()
            .filter(post::Column::AuthorId.eq(id))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .limit(PROFILE_ACTIVITY_LIMIT)
            .find_also_related(Thread)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(post, thread)| ProfilePost {
                net_votes: post.net_votes(),
                thread_title: thread.map(|t| t.title),
                post,
            })
            .collect();

        Ok(UserProfile {
            user,
            threads,
            posts,
        })
    }

    pub async fn update_bio(&self, id: i32, bio: Option<String>) -> AppResult<UserModel> {
        let existing = self.get_by_id(id).await?;

        let bio = bio.map(|b| b.trim().to_string()).filter(|b| !b.is_empty());
        let mut active: user::ActiveModel = existing.into();
        active.bio = sea_orm::ActiveValue::Set(bio);

        let updated = active.update(&self.db).await?;
        tracing::debug!(user_id = id, "profile updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_hides_credentials() {
        let user = UserModel {
            id: 4,
            username: "carol".into(),
            password_hash: "$2b$secret".into(),
            joined_at: chrono::NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            post_count: 2,
            thread_count: 1,
            reputation: -3,
            rank: "Newbie".into(),
            bio: Some("hi".into()),
        };

        let json = serde_json::to_value(AuthorSummary::from(&user)).unwrap();
        assert_eq!(json["username"], "carol");
        assert_eq!(json["reputation"], -3);
        assert!(json.get("password_hash").is_none());
        assert!(json.get("bio").is_none());
    }
}
