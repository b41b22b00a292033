use crate::{
    error::{AppError, AppResult},
    models::{category, post, thread, Category, CategoryModel, Post, Thread, User},
    services::{thread::ThreadView, user::AuthorSummary},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

pub const DEFAULT_ICON: &str = "folder";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryWithStats {
    #[serde(flatten)]
    pub category: CategoryModel,
    pub thread_count: i64,
    pub post_count: i64,
    pub last_thread: Option<ThreadView>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub sort_order: i32,
}

pub struct CategoryService {
    db: DatabaseConnection,
}

impl CategoryService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<CategoryModel>> {
        let categories = Category::find()
            .order_by_asc(category::Column::SortOrder)
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await?;
        Ok(categories)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<CategoryModel> {
        Category::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("Category"))
    }

    pub async fn create(&self, input: NewCategory) -> AppResult<CategoryModel> {
        let icon = input
            .icon
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| DEFAULT_ICON.to_string());

        let category = category::ActiveModel {
            name: sea_orm::ActiveValue::Set(input.name),
            description: sea_orm::ActiveValue::Set(input.description),
            icon: sea_orm::ActiveValue::Set(icon),
            sort_order: sea_orm::ActiveValue::Set(input.sort_order),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        tracing::info!(category_id = category.id, name = %category.name, "category created");
        Ok(category)
    }

    /// Categories in display order, each with thread and post totals and the
    /// most recently created thread.
    pub async fn list_with_stats(&self) -> AppResult<Vec<CategoryWithStats>> {
        let categories = self.list().await?;

        let thread_counts: HashMap<i32, i64> = Thread::find()
            .select_only()
            .column(thread::Column::CategoryId)
            .column_as(Expr::col((Thread, thread::Column::Id)).count(), "count")
            .group_by(thread::Column::CategoryId)
            .into_tuple::<(i32, i64)>()
            .all(&self.db)
            .await?
            .into_iter()
            .collect();

        let post_counts: HashMap<i32, i64> = Post::find()
            .select_only()
            .column(thread::Column::CategoryId)
            .column_as(Expr::col((Post, post::Column::Id)).count(), "count")
            .join(JoinType::InnerJoin, post::Relation::Thread.def())
            .group_by(thread::Column::CategoryId)
            .into_tuple::<(i32, i64)>()
            .all(&self.db)
            .await?
            .into_iter()
            .collect();

        let mut result = Vec::with_capacity(categories.len());
        for category in categories {
            let last_thread = Thread::find()
                .filter(thread::Column::CategoryId.eq(category.id))
                .order_by_desc(thread::Column::CreatedAt)
                .order_by_desc(thread::Column::Id)
                .find_also_related(User)
                .one(&self.db)
                .await?
                .map(|(thread, author)| ThreadView {
                    thread,
                    author: author.as_ref().map(AuthorSummary::from),
                    category: None,
                });

            result.push(CategoryWithStats {
                thread_count: thread_counts.get(&category.id).copied().unwrap_or(0),
                post_count: post_counts.get(&category.id).copied().unwrap_or(0),
                last_thread,
                category,
            });
        }

        Ok(result)
    }
}
