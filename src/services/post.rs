use crate::{
    error::{AppError, AppResult},
    models::{post, user, Post, PostModel, Thread, User},
    services::{
        counters,
        reply_tree::{build_reply_tree, ReplyTreeNode},
        vote::VoteService,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use std::collections::HashMap;

pub struct PostService {
    db: DatabaseConnection,
}

impl PostService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reply in a thread, optionally under an earlier post of the same thread.
    ///
    /// Holds the thread row lock until commit so `reply_count` and
    /// `last_activity_at` move together with the insert.
    pub async fn create(
        &self,
        author_id: i32,
        thread_id: i32,
        parent_post_id: Option<i32>,
        content: &str,
    ) -> AppResult<PostModel> {
        let txn = self.db.begin().await?;

        let thread = Thread::find_by_id(thread_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound("Thread"))?;

        if thread.is_locked {
            return Err(AppError::ThreadLocked);
        }

        if let Some(parent_id) = parent_post_id {
            let parent = Post::find_by_id(parent_id)
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::Validation("Parent post does not exist".to_string()))?;
            if parent.thread_id != thread_id {
                return Err(AppError::Validation(
                    "Parent post belongs to a different thread".to_string(),
                ));
            }
        }

        let now = chrono::Utc::now().naive_utc().max(thread.last_activity_at);
        let post = post::ActiveModel {
            thread_id: sea_orm::ActiveValue::Set(thread_id),
            author_id: sea_orm::ActiveValue::Set(author_id),
            content: sea_orm::ActiveValue::Set(content.to_string()),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
            parent_post_id: sea_orm::ActiveValue::Set(parent_post_id),
            upvotes: sea_orm::ActiveValue::Set(0),
            downvotes: sea_orm::ActiveValue::Set(0),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        counters::record_reply(&txn, thread_id, now).await?;
        counters::increment_post_count(&txn, author_id).await?;
        txn.commit().await?;

        tracing::info!(
            post_id = post.id,
            thread_id,
            author_id,
            parent_post_id = ?parent_post_id,
            "post created"
        );
        Ok(post)
    }

    /// Posts of a thread in creation order.
    pub async fn list_by_thread(&self, thread_id: i32) -> AppResult<Vec<PostModel>> {
        let posts = Post::find()
            .filter(post::Column::ThreadId.eq(thread_id))
            .order_by_asc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await?;
        Ok(posts)
    }

    /// The thread's posts as a reply forest, each node carrying its author
    /// and `viewer`'s vote.
    pub async fn reply_tree(
        &self,
        thread_id: i32,
        viewer: Option<i32>,
    ) -> AppResult<Vec<ReplyTreeNode>> {
        Thread::find_by_id(thread_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("Thread"))?;

        let posts = self.list_by_thread(thread_id).await?;

        let mut author_ids: Vec<i32> = posts.iter().map(|p| p.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let authors: HashMap<i32, _> = if author_ids.is_empty() {
            HashMap::new()
        } else {
            User::find()
                .filter(user::Column::Id.is_in(author_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|u| (u.id, u))
                .collect()
        };

        let viewer_votes = match viewer {
            Some(user_id) => {
                let post_ids: Vec<i32> = posts.iter().map(|p| p.id).collect();
                VoteService::new(self.db.clone())
                    .votes_by_user(user_id, &post_ids)
                    .await?
            }
            None => HashMap::new(),
        };

        Ok(build_reply_tree(posts, &authors, &viewer_votes))
    }
}
