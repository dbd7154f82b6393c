//! Wire types for the HTTP API and their mapping to and from the domain.

pub mod event;
pub mod page;
pub mod ticket;
