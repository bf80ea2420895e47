//! Credential primitives shared by the platform's services
//!
//! - Password hashing (Argon2id)
//! - Signed session tokens (JWT, HS256)
//! - Opaque single-use tokens for emailed links
//!
//! Nothing here knows about users or roles beyond the strings it is handed;
//! services layer their own policy on top.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_params(1024, 1, 1).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("not_my_password", &hash));
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::ClaimsCodec;
//! use chrono::Duration;
//!
//! let codec = ClaimsCodec::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24)).unwrap();
//! let token = codec.issue("user123", "PATIENT").unwrap();
//! let claims = codec.validate(&token).unwrap();
//! assert_eq!(claims.role, "PATIENT");
//! ```
//!
//! ## Single-use Tokens
//! ```
//! use auth::token::{new_token, SINGLE_USE_TOKEN_BYTES};
//!
//! let token = new_token(SINGLE_USE_TOKEN_BYTES).unwrap();
//! assert_eq!(token.len(), 43);
//! ```

pub mod jwt;
pub mod password;
pub mod session;
pub mod token;

pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SessionClaims;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use session::ClaimsCodec;
pub use token::TokenError;
