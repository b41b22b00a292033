use crate::{
    error::{AppError, AppResult},
    models::{user, User, UserModel},
    utils::{encode_access_token, hash_password, verify_password},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, SqlErr,
};

pub struct AuthService {
    db: DatabaseConnection,
}

impl AuthService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create an account and sign it in.
    /// Returns (user_model, access_token).
    pub async fn register(&self, username: &str, password: &str) -> AppResult<(UserModel, String)> {
        if self.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        let password_hash = hash_password(password)?;
        let now = chrono::Utc::now().naive_utc();

        let new_user = user::ActiveModel {
            username: sea_orm::ActiveValue::Set(username.to_string()),
            password_hash: sea_orm::ActiveValue::Set(password_hash),
            joined_at: sea_orm::ActiveValue::Set(now),
            post_count: sea_orm::ActiveValue::Set(0),
            thread_count: sea_orm::ActiveValue::Set(0),
            reputation: sea_orm::ActiveValue::Set(0),
            rank: sea_orm::ActiveValue::Set(user::DEFAULT_RANK.to_string()),
            bio: sea_orm::ActiveValue::Set(None),
            ..Default::default()
        };

        // A concurrent registration can still win the race; the unique index decides.
        let user = new_user.insert(&self.db).await.map_err(|e| {
            match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::Conflict("Username already taken".to_string())
                }
                _ => AppError::Database(e),
            }
        })?;

        let token = encode_access_token(user.id)?;
        tracing::info!(user_id = user.id, username = %user.username, "user registered");
        Ok((user, token))
    }

    /// Returns (user_model, access_token).
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(UserModel, String)> {
        let user = self
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let token = encode_access_token(user.id)?;
        Ok((user, token))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserModel>> {
        let user = User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        Ok(user)
    }
}
