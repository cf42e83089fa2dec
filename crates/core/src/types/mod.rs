//! Core types for Tienda.
//!
//! Type-safe wrappers for the domain concepts shared between the account
//! service and the product gateway.

pub mod email;
pub mod id;
pub mod username;

pub use email::{Email, EmailError};
pub use id::{CategoryId, ProductId, UserId};
pub use username::{Username, UsernameError};
