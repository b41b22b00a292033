//! Denormalized counters kept next to the rows they summarize.
//!
//! Every helper issues a single `UPDATE … SET col = col + n` so concurrent
//! writers never lose an increment. They take any [`ConnectionTrait`] so the
//! caller can run them inside the transaction that writes the source row.

use crate::{
    error::{AppError, AppResult},
    models::{post, thread, user, Post, Thread, User},
};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

pub async fn increment_thread_count<C: ConnectionTrait>(conn: &C, user_id: i32) -> AppResult<()> {
    bump_user(conn, user_id, user::Column::ThreadCount, 1).await
}

pub async fn increment_post_count<C: ConnectionTrait>(conn: &C, user_id: i32) -> AppResult<()> {
    bump_user(conn, user_id, user::Column::PostCount, 1).await
}

pub async fn adjust_reputation<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    delta: i32,
) -> AppResult<()> {
    if delta == 0 {
        return Ok(());
    }
    bump_user(conn, user_id, user::Column::Reputation, delta).await
}

/// A new post landed in `thread_id`: one more reply, and activity moves to `at`.
pub async fn record_reply<C: ConnectionTrait>(
    conn: &C,
    thread_id: i32,
    at: chrono::NaiveDateTime,
) -> AppResult<()> {
    let result = Thread::update_many()
        .col_expr(
            thread::Column::ReplyCount,
            Expr::col(thread::Column::ReplyCount).add(1),
        )
        .col_expr(thread::Column::LastActivityAt, Expr::value(at))
        .filter(thread::Column::Id.eq(thread_id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Thread"));
    }
    Ok(())
}

pub async fn increment_view_count<C: ConnectionTrait>(conn: &C, thread_id: i32) -> AppResult<()> {
    let result = Thread::update_many()
        .col_expr(
            thread::Column::ViewCount,
            Expr::col(thread::Column::ViewCount).add(1),
        )
        .filter(thread::Column::Id.eq(thread_id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Thread"));
    }
    Ok(())
}

/// Shift a post's vote tallies. Each tally moves by at most one per vote change.
pub async fn adjust_post_votes<C: ConnectionTrait>(
    conn: &C,
    post_id: i32,
    upvotes: i32,
    downvotes: i32,
) -> AppResult<()> {
    if upvotes == 0 && downvotes == 0 {
        return Ok(());
    }

    let mut update = Post::update_many();
    if upvotes != 0 {
        update = update.col_expr(
            post::Column::Upvotes,
            Expr::col(post::Column::Upvotes).add(upvotes),
        );
    }
    if downvotes != 0 {
        update = update.col_expr(
            post::Column::Downvotes,
            Expr::col(post::Column::Downvotes).add(downvotes),
        );
    }

    let result = update.filter(post::Column::Id.eq(post_id)).exec(conn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Post"));
    }
    Ok(())
}

async fn bump_user<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    column: user::Column,
    delta: i32,
) -> AppResult<()> {
    let result = User::update_many()
        .col_expr(column, Expr::col(column).add(delta))
        .filter(user::Column::Id.eq(user_id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("User"));
    }
    Ok(())
}
