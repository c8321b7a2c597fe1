//! SeaORM entities, one module per table.

pub mod post;
pub mod post_report;
pub mod user;
pub mod user_badge;
pub mod user_vote;
