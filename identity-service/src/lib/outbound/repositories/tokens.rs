use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use super::storage_error;
use crate::identity::errors::AuthError;
use crate::identity::errors::TokenError;
use crate::identity::models::UserId;
use crate::identity::ports::TokenRepository;
use crate::identity::tokens::SingleUseToken;
use crate::identity::tokens::TokenKind;

fn table(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::EmailVerification => "email_verification_tokens",
        TokenKind::PasswordReset => "password_reset_tokens",
    }
}

#[derive(Debug, FromRow)]
struct TokenRow {
    token: String,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
    used_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<TokenRow> for SingleUseToken {
    fn from(row: TokenRow) -> Self {
        Self {
            token: row.token,
            user_id: UserId(row.user_id),
            expires_at: row.expires_at,
            used_at: row.used_at,
            created_at: row.created_at,
        }
    }
}

/// Token tables in PostgreSQL.
///
/// Consumption claims the row with `UPDATE ... WHERE used_at IS NULL` inside
/// the same transaction as the user update, so concurrent redemptions of
/// one token serialize on the row lock and only the first one commits.
pub struct PostgresTokenRepository {
    pool: PgPool,
}

impl PostgresTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PostgresTokenRepository {
    async fn insert(&self, kind: TokenKind, token: &SingleUseToken) -> Result<(), AuthError> {
        let query = format!(
            "INSERT INTO {} (token, user_id, expires_at, used_at, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
            table(kind)
        );

        sqlx::query(&query)
            .bind(&token.token)
            .bind(token.user_id.0)
            .bind(token.expires_at)
            .bind(token.used_at)
            .bind(token.created_at)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(())
    }

    async fn replace_reset_token(&self, token: &SingleUseToken) -> Result<(), AuthError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let retired = sqlx::query(
            r#"
            UPDATE password_reset_tokens
            SET used_at = $2
            WHERE user_id = $1 AND used_at IS NULL
            "#,
        )
        .bind(token.user_id.0)
        .bind(token.created_at)
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;

        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (token, user_id, expires_at, used_at, created_at)
            VALUES ($1, $2, $3, NULL, $4)
            "#,
        )
        .bind(&token.token)
        .bind(token.user_id.0)
        .bind(token.expires_at)
        .bind(token.created_at)
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;

        tracing::debug!(
            user_id = %token.user_id,
            retired = retired.rows_affected(),
            "Reset tokens replaced"
        );
        Ok(())
    }

    async fn find(
        &self,
        kind: TokenKind,
        token: &str,
    ) -> Result<Option<SingleUseToken>, AuthError> {
        let query = format!(
            "SELECT token, user_id, expires_at, used_at, created_at FROM {} WHERE token = $1",
            table(kind)
        );

        let row = sqlx::query_as::<_, TokenRow>(&query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(row.map(SingleUseToken::from))
    }

    async fn consume_verification(&self, token: &str, user_id: &UserId) -> Result<(), AuthError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let claimed = sqlx::query(
            r#"
            UPDATE email_verification_tokens
            SET used_at = $3
            WHERE token = $1 AND user_id = $2 AND used_at IS NULL
            "#,
        )
        .bind(token)
        .bind(user_id.0)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;

        if claimed.rows_affected() == 0 {
            return Err(TokenError::AlreadyUsed.into());
        }

        let updated = sqlx::query("UPDATE users SET is_verified = TRUE WHERE id = $1")
            .bind(user_id.0)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        if updated.rows_affected() == 0 {
            return Err(AuthError::UserNotFound(user_id.to_string()));
        }

        tx.commit().await.map_err(storage_error)
    }

    async fn consume_reset(
        &self,
        token: &str,
        user_id: &UserId,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let claimed = sqlx::query(
            r#"
            UPDATE password_reset_tokens
            SET used_at = $3
            WHERE token = $1 AND user_id = $2 AND used_at IS NULL
            "#,
        )
        .bind(token)
        .bind(user_id.0)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;

        if claimed.rows_affected() == 0 {
            return Err(TokenError::AlreadyUsed.into());
        }

        let updated = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(user_id.0)
            .bind(password_hash)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        if updated.rows_affected() == 0 {
            return Err(AuthError::UserNotFound(user_id.to_string()));
        }

        tx.commit().await.map_err(storage_error)
    }
}
