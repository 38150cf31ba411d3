//! API handlers
//!
//! Each handler follows a consistent pattern:
//! - Extract state and parameters using Axum extractors
//! - Validate input parameters
//! - Call the appropriate service methods
//! - Map the result to the standardized response envelope

pub mod response;
pub mod swap;

pub use response::ApiResponse;
