//! Services module for invoicing-service.

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtService};
