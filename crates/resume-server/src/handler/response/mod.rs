//! Response types for HTTP handlers.

mod accounts;
mod api_response;
mod authentications;
mod error_response;

pub use accounts::*;
pub use api_response::ApiResponse;
pub use authentications::*;
pub use error_response::ErrorResponse;
