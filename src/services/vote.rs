use crate::{
    error::{AppError, AppResult},
    models::{vote, Post, PostModel, User, Vote, VoteModel},
    services::counters,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect,
    TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

/// A single up or down vote. There is no neutral value: once cast, a vote can only flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    pub fn as_i16(self) -> i16 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }

    fn as_i32(self) -> i32 {
        i32::from(self.as_i16())
    }

    /// Decode a value already stored in the votes table.
    fn from_stored(value: i16) -> AppResult<Self> {
        Self::try_from(value).map_err(|_| {
            AppError::Internal(anyhow::anyhow!("Stored vote has invalid value {value}"))
        })
    }
}

impl TryFrom<i16> for VoteValue {
    type Error = AppError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VoteValue::Up),
            -1 => Ok(VoteValue::Down),
            _ => Err(AppError::Validation(
                "Vote value must be -1 or 1".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VoteChange {
    /// First vote by this user on this post.
    Created,
    /// Existing vote switched sign.
    Flipped,
    /// Same value recast; nothing written.
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerDelta {
    pub upvotes: i32,
    pub downvotes: i32,
    pub reputation: i32,
}

/// Counter movements for replacing `previous` with `next`.
///
/// `upvotes - downvotes` on the post and the author's reputation both move by
/// `next - previous` (treating no vote as 0), while each tally moves by at most one.
pub fn ledger_delta(previous: Option<VoteValue>, next: VoteValue) -> (VoteChange, LedgerDelta) {
    let tally = |v: VoteValue| match v {
        VoteValue::Up => LedgerDelta {
            upvotes: 1,
            ..Default::default()
        },
        VoteValue::Down => LedgerDelta {
            downvotes: 1,
            ..Default::default()
        },
    };

    match previous {
        None => {
            let mut delta = tally(next);
            delta.reputation = next.as_i32();
            (VoteChange::Created, delta)
        }
        Some(old) if old == next => (VoteChange::Unchanged, LedgerDelta::default()),
        Some(old) => {
            let (removed, added) = (tally(old), tally(next));
            (
                VoteChange::Flipped,
                LedgerDelta {
                    upvotes: added.upvotes - removed.upvotes,
                    downvotes: added.downvotes - removed.downvotes,
                    reputation: next.as_i32() - old.as_i32(),
                },
            )
        }
    }
}

#[derive(Debug, Clone)]
pub struct VoteOutcome {
    pub vote: VoteModel,
    pub change: VoteChange,
    /// The post after counters were applied.
    pub post: PostModel,
    pub author_reputation: i32,
}

pub struct VoteService {
    db: DatabaseConnection,
}

impl VoteService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Record `user_id`'s vote on `post_id` and keep the post tallies and the
    /// author's reputation in step with it.
    ///
    /// The post row stays locked for the whole transaction, so concurrent votes
    /// on the same post serialize and each one sees the previous vote row.
    pub async fn cast_vote(
        &self,
        user_id: i32,
        post_id: i32,
        value: VoteValue,
    ) -> AppResult<VoteOutcome> {
        let txn = self.db.begin().await?;

        let post = Post::find_by_id(post_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound("Post"))?;

        let existing = Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::PostId.eq(post_id))
            .one(&txn)
            .await?;

        let previous = existing
            .as_ref()
            .map(|v| VoteValue::from_stored(v.value))
            .transpose()?;
        let (change, delta) = ledger_delta(previous, value);

        let vote = match existing {
            None => {
                vote::ActiveModel {
                    user_id: sea_orm::ActiveValue::Set(user_id),
                    post_id: sea_orm::ActiveValue::Set(post_id),
                    value: sea_orm::ActiveValue::Set(value.as_i16()),
                    created_at: sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc()),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
            Some(existing) if change == VoteChange::Flipped => {
                let mut active: vote::ActiveModel = existing.into();
                active.value = sea_orm::ActiveValue::Set(value.as_i16());
                active.update(&txn).await?
            }
            Some(existing) => existing,
        };

        counters::adjust_post_votes(&txn, post_id, delta.upvotes, delta.downvotes).await?;
        counters::adjust_reputation(&txn, post.author_id, delta.reputation).await?;

        let post = Post::find_by_id(post_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound("Post"))?;
        let author = User::find_by_id(post.author_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        txn.commit().await?;

        tracing::debug!(
            user_id,
            post_id,
            value = value.as_i16(),
            ?change,
            upvotes = post.upvotes,
            downvotes = post.downvotes,
            author_id = author.id,
            reputation = author.reputation,
            "vote recorded"
        );

        Ok(VoteOutcome {
            vote,
            change,
            post,
            author_reputation: author.reputation,
        })
    }

    /// The viewer's vote on each of `post_ids` they have voted on.
    pub async fn votes_by_user(
        &self,
        user_id: i32,
        post_ids: &[i32],
    ) -> AppResult<HashMap<i32, i16>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let votes = Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::PostId.is_in(post_ids.iter().copied()))
            .all(&self.db)
            .await?;

        Ok(votes.into_iter().map(|v| (v.post_id, v.value)).collect())
    }
}
