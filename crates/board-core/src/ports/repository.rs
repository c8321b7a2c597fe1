use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Badge, Post, PostQuery, PostReport, PostStatus, Review, User, UserBadge, UserVote, VoteChange,
};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Persist the login bookkeeping of a user without touching any other column.
    async fn record_login(
        &self,
        user_id: Uuid,
        failed_attempts: i32,
        locked_until: Option<DateTime<Utc>>,
        at: DateTime<Utc>,
    ) -> Result<(), RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError>;

    async fn search(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError>;

    /// Count posts created by a user, optionally restricted to one status.
    async fn count_by_user(
        &self,
        user_id: Uuid,
        status: Option<PostStatus>,
    ) -> Result<u64, RepoError>;

    /// Persist a moderation decision.
    ///
    /// Declining deletes every report on the post and resets its report count,
    /// in the same transaction as the status change.
    async fn apply_review(&self, post_id: Uuid, review: &Review) -> Result<Post, RepoError>;
}

/// Post report repository.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn exists(&self, post_id: Uuid, reporter_id: Uuid) -> Result<bool, RepoError>;

    /// Insert the report and bump the post's report count atomically.
    ///
    /// Returns the post's new report count. A second report by the same user
    /// fails with [`RepoError::Constraint`]; a post that is no longer approved
    /// fails with [`RepoError::Stale`].
    async fn file(&self, report: PostReport) -> Result<i32, RepoError>;

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<PostReport>, RepoError>;
}

/// User vote repository.
#[async_trait]
pub trait VoteRepository: Send + Sync {
    async fn find(&self, user_id: Uuid, post_id: Uuid) -> Result<Option<UserVote>, RepoError>;

    /// Apply a vote change: insert, flip or delete the vote row and adjust the
    /// post tallies and the voter's points, all in one transaction.
    async fn apply(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        change: &VoteChange,
    ) -> Result<(), RepoError>;

    /// Number of votes the user currently holds.
    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, RepoError>;

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<UserVote>, RepoError>;
}

/// Awarded badge repository.
#[async_trait]
pub trait BadgeRepository: Send + Sync {
    async fn exists(&self, user_id: Uuid, badge: Badge) -> Result<bool, RepoError>;

    /// Insert an award. A repeat award fails with [`RepoError::Constraint`].
    async fn award(&self, badge: UserBadge) -> Result<UserBadge, RepoError>;

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<UserBadge>, RepoError>;
}
