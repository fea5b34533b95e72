pub mod client;
pub mod retry;

pub use client::{HttpClient, Param, RenderedPath, render_path};
pub use retry::{Backoff, RetryPolicy, classify_status, is_retryable_status};
