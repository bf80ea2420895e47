pub mod emails;
pub mod errors;
pub mod events;
pub mod models;
pub mod notifier;
pub mod policy;
pub mod ports;
pub mod service;
pub mod tokens;
