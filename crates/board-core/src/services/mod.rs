//! The board rules engine.
//!
//! [`BoardService`] is the single entry point for every board mutation and
//! query. Callers pass the authenticated [`Actor`](crate::domain::Actor)
//! explicitly; the service never reads ambient session state.

mod accounts;
mod badges;
mod moderation;
mod reporting;
mod voting;

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Badge, LockoutPolicy, Post, PostStatus, ReportPolicy, VoteType};
use crate::error::DomainError;
use crate::ports::{
    BadgeRepository, PostRepository, ReportRepository, UserRepository, VoteRepository,
};

/// Tunable thresholds of the board.
#[derive(Debug, Clone, Default)]
pub struct BoardPolicy {
    pub reports: ReportPolicy,
    pub lockout: LockoutPolicy,
}

/// Repository handles the service works against.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub reports: Arc<dyn ReportRepository>,
    pub votes: Arc<dyn VoteRepository>,
    pub badges: Arc<dyn BadgeRepository>,
}

/// Outcome of casting a vote.
#[derive(Debug, Clone, Serialize)]
pub struct VoteReceipt {
    pub post_id: Uuid,
    /// The vote the user holds after the cast; `None` after a retraction.
    pub vote: Option<VoteType>,
    pub upvotes: i32,
    pub downvotes: i32,
    pub points: i32,
    pub awarded: Vec<Badge>,
}

/// Outcome of filing a report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportReceipt {
    pub post_id: Uuid,
    pub report_count: i32,
    pub status: PostStatus,
    pub auto_declined: bool,
}

pub struct BoardService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    reports: Arc<dyn ReportRepository>,
    votes: Arc<dyn VoteRepository>,
    badges: Arc<dyn BadgeRepository>,
    policy: BoardPolicy,
}

impl BoardService {
    pub fn new(repos: Repositories, policy: BoardPolicy) -> Self {
        Self {
            users: repos.users,
            posts: repos.posts,
            reports: repos.reports,
            votes: repos.votes,
            badges: repos.badges,
            policy,
        }
    }

    pub fn policy(&self) -> &BoardPolicy {
        &self.policy
    }

    async fn load_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))
    }
}
