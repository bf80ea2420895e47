pub mod errors;
pub mod generator;

pub use errors::TokenError;
pub use generator::new_token;
pub use generator::SINGLE_USE_TOKEN_BYTES;
