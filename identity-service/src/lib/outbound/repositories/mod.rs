use crate::identity::errors::AuthError;

pub mod tokens;
pub mod users;

pub use tokens::PostgresTokenRepository;
pub use users::PostgresUserRepository;

fn storage_error(error: sqlx::Error) -> AuthError {
    AuthError::Storage(error.to_string())
}
