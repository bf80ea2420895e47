pub mod http;

pub use http::HttpFallbackNotifier;
