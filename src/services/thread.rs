use crate::{
    error::{AppError, AppResult},
    models::{thread, Category, CategoryModel, Thread, ThreadModel, User},
    services::{counters, user::AuthorSummary},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

const RECENT_THREADS_LIMIT: u64 = 10;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ThreadView {
    #[serde(flatten)]
    pub thread: ThreadModel,
    pub author: Option<AuthorSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryModel>,
}

#[derive(Debug, Clone)]
pub struct NewThread {
    pub category_id: i32,
    pub title: String,
    pub content: String,
    pub is_pinned: bool,
    pub is_locked: bool,
}

pub struct ThreadService {
    db: DatabaseConnection,
}

impl ThreadService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<ThreadModel> {
        Thread::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("Thread"))
    }

    /// Insert the thread and credit the author in one transaction.
    pub async fn create(&self, author_id: i32, input: NewThread) -> AppResult<ThreadModel> {
        let txn = self.db.begin().await?;

        Category::find_by_id(input.category_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound("Category"))?;

        let now = chrono::Utc::now().naive_utc();
        let thread = thread::ActiveModel {
            category_id: sea_orm::ActiveValue::Set(input.category_id),
            author_id: sea_orm::ActiveValue::Set(author_id),
            title: sea_orm::ActiveValue::Set(input.title),
            content: sea_orm::ActiveValue::Set(input.content),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
            view_count: sea_orm::ActiveValue::Set(0),
            reply_count: sea_orm::ActiveValue::Set(0),
            is_pinned: sea_orm::ActiveValue::Set(input.is_pinned),
            is_locked: sea_orm::ActiveValue::Set(input.is_locked),
            last_activity_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        counters::increment_thread_count(&txn, author_id).await?;
        txn.commit().await?;

        tracing::info!(
            thread_id = thread.id,
            category_id = thread.category_id,
            author_id,
            "thread created"
        );
        Ok(thread)
    }

    /// Pinned threads first, then by latest activity.
    pub async fn list_by_category(&self, category_id: i32) -> AppResult<Vec<ThreadView>> {
        Category::find_by_id(category_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("Category"))?;

        let rows = Thread::find()
            .filter(thread::Column::CategoryId.eq(category_id))
            .order_by_desc(thread::Column::IsPinned)
            .order_by_desc(thread::Column::LastActivityAt)
            .order_by_desc(thread::Column::Id)
            .find_also_related(User)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(thread, author)| ThreadView {
                thread,
                author: author.as_ref().map(AuthorSummary::from),
                category: None,
            })
            .collect())
    }

    pub async fn recent(&self) -> AppResult<Vec<ThreadView>> {
        let rows = Thread::find()
            .order_by_desc(thread::Column::CreatedAt)
            .order_by_desc(thread::Column::Id)
            .limit(RECENT_THREADS_LIMIT)
            .find_also_related(User)
            .all(&self.db)
            .await?;

        let category_ids: Vec<i32> = rows.iter().map(|(t, _)| t.category_id).collect();
        let categories = load_categories(&self.db, &category_ids).await?;

        Ok(rows
            .into_iter()
            .map(|(thread, author)| ThreadView {
                author: author.as_ref().map(AuthorSummary::from),
                category: categories.get(&thread.category_id).cloned(),
                thread,
            })
            .collect())
    }

    /// Count a view, then load the thread with its author and category.
    pub async fn view(&self, id: i32) -> AppResult<ThreadView> {
        counters::increment_view_count(&self.db, id).await?;

        let (thread, author) = Thread::find_by_id(id)
            .find_also_related(User)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("Thread"))?;

        let category = Category::find_by_id(thread.category_id).one(&self.db).await?;

        Ok(ThreadView {
            author: author.as_ref().map(AuthorSummary::from),
            category,
            thread,
        })
    }
}

async fn load_categories<C: ConnectionTrait>(
    conn: &C,
    ids: &[i32],
) -> AppResult<HashMap<i32, CategoryModel>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let categories = Category::find()
        .filter(crate::models::category::Column::Id.is_in(ids.iter().copied()))
        .all(conn)
        .await?;

    Ok(categories.into_iter().map(|c| (c.id, c)).collect())
}
