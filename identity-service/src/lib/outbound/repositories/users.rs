use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use super::storage_error;
use crate::identity::errors::AuthError;
use crate::identity::models::EmailAddress;
use crate::identity::models::Role;
use crate::identity::models::User;
use crate::identity::models::UserId;
use crate::identity::models::VerificationStatus;
use crate::identity::ports::UserRepository;

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    role: String,
    first_name: Option<String>,
    last_name: Option<String>,
    is_active: bool,
    is_verified: bool,
    verification_status: String,
    license_number: Option<String>,
    clinic_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AuthError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| AuthError::Storage(format!("user {}: {}", row.id, e)))?;
        let verification_status = row
            .verification_status
            .parse::<VerificationStatus>()
            .map_err(|e| AuthError::Storage(format!("user {}: {}", row.id, e)))?;

        Ok(User {
            id: UserId(row.id),
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            role,
            first_name: row.first_name,
            last_name: row.last_name,
            is_active: row.is_active,
            is_verified: row.is_verified,
            verification_status,
            license_number: row.license_number,
            clinic_id: row.clinic_id,
            created_at: row.created_at,
        })
    }
}

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, password_hash, role, first_name, last_name, is_active,
                is_verified, verification_status, license_number, clinic_id, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_active)
        .bind(user.is_verified)
        .bind(user.verification_status.as_str())
        .bind(&user.license_number)
        .bind(user.clinic_id)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    if db_err.constraint() == Some("users_email_key") {
                        return AuthError::UserExists(user.email.to_string());
                    }
                    if db_err.constraint() == Some("users_license_number_key") {
                        return AuthError::LicenseNumberTaken(
                            user.license_number.clone().unwrap_or_default(),
                        );
                    }
                }
            }
            storage_error(e)
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, role, first_name, last_name, is_active,
                   is_verified, verification_status, license_number, clinic_id, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, role, first_name, last_name, is_active,
                   is_verified, verification_status, license_number, clinic_id, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.map(User::try_from).transpose()
    }

    async fn set_verification_status(
        &self,
        id: &UserId,
        status: VerificationStatus,
    ) -> Result<(), AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET verification_status = $2
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound(id.to_string()));
        }

        Ok(())
    }

    async fn assign_clinic(&self, id: &UserId, clinic_id: i64) -> Result<(), AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET clinic_id = $2
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(clinic_id)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound(id.to_string()));
        }

        Ok(())
    }
}
