//! HTTP boundary module
//!
//! The typed request and response envelope shared by the dispatcher, the
//! serverless invocation path and the local HTTP host.

pub mod request;
pub mod response;

// Re-export commonly used types
pub use request::ApiRequest;
pub use response::{ApiResponse, ResponseHeaders};
