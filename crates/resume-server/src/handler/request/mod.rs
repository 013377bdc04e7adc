//! Request types for HTTP handlers.

mod accounts;
mod authentications;

pub use accounts::*;
pub use authentications::*;
