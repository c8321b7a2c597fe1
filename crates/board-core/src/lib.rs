//! # Board Core
//!
//! The domain layer of the community board.
//! Moderation, voting, reporting and badge rules live here as pure logic,
//! orchestrated by [`services::BoardService`] over the repository ports.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
pub use services::{BoardPolicy, BoardService};
