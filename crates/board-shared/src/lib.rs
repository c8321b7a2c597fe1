//! # Board Shared
//!
//! Wire types shared between the board API and its clients.
//! Kept free of server dependencies so it can be compiled for WASM.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
