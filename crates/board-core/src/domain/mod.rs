//! Domain entities - the core business objects and the rules that govern them.

mod badge;
mod post;
mod report;
mod user;
mod vote;

pub use badge::{Badge, BadgeTrack, UserBadge};
pub use post::{
    MAX_CATEGORY_LEN, MAX_CONTENT_LEN, MAX_REVIEW_MSG_LEN, Post, PostDraft, PostQuery, PostSort,
    PostStatus, Review,
};
pub use report::{MAX_REASON_LEN, PostReport, ReportPolicy};
pub use user::{Actor, LockoutPolicy, Role, User};
pub use vote::{UserVote, VoteChange, VoteType};
