pub mod client;

pub use client::HttpEmailClient;
