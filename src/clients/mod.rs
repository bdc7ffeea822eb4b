//! Role assumption client implementations.
//!
//! Real clients live outside this crate; implement
//! [`RoleAssumptionClient`](crate::RoleAssumptionClient) over whichever
//! STS SDK or HTTP stack the application already uses.

#[cfg(feature = "mock")]
pub mod mock;
