//! Authentication extractors.
//!
//! - [`Principal`] - Identity and role of the caller
//! - [`Role`] - Privilege domain of an account
//! - [`PrincipalResolver`] - Resolves a principal from a raw `Authorization` header

mod principal;
mod resolver;

pub use self::principal::{Principal, Role};
pub use self::resolver::{PrincipalResolver, ResolveError};
