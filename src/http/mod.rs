//! HTTP client layer — `MetalsHttp` with a configurable retry policy.

pub mod client;
pub mod retry;

pub use client::MetalsHttp;
pub use retry::{RetryConfig, RetryPolicy};
