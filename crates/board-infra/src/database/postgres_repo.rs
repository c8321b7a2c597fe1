//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use board_core::domain::{
    Badge, Post, PostQuery, PostReport, PostSort, PostStatus, Review, User, UserBadge, UserVote,
    VoteChange,
};
use board_core::error::RepoError;
use board_core::ports::{
    BadgeRepository, PostRepository, ReportRepository, UserRepository, VoteRepository,
};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_report::{self, Entity as ReportEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::entity::user_badge::{self, Entity as BadgeEntity};
use super::entity::user_vote::{self, Entity as VoteEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL report repository.
pub type PostgresReportRepository = PostgresBaseRepository<ReportEntity>;

/// PostgreSQL vote repository.
pub type PostgresVoteRepository = PostgresBaseRepository<VoteEntity>;

/// PostgreSQL badge repository.
pub type PostgresBadgeRepository = PostgresBaseRepository<BadgeEntity>;

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{first}***@{domain}")
        }
        None => "***".to_string(),
    }
}

/// Escape LIKE wildcards so keywords match literally.
fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn record_login(
        &self,
        user_id: Uuid,
        failed_attempts: i32,
        locked_until: Option<DateTime<Utc>>,
        at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        let locked_until: Option<DateTimeWithTimeZone> = locked_until.map(Into::into);
        let at: DateTimeWithTimeZone = at.into();

        let result = UserEntity::update_many()
            .col_expr(user::Column::FailedAttempts, Expr::value(failed_attempts))
            .col_expr(user::Column::LockedUntil, Expr::value(locked_until))
            .col_expr(user::Column::UpdatedAt, Expr::value(at))
            .filter(user::Column::Id.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::CreatedBy.eq(user_id))
            .order_by_desc(post::Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn search(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let mut select = PostEntity::find();

        if let Some(category) = &query.category {
            select = select.filter(post::Column::Category.eq(category.as_str()));
        }
        if !query.statuses.is_empty() {
            select = select.filter(
                post::Column::Status.is_in(query.statuses.iter().map(|s| post::Status::from(*s))),
            );
        }
        if let Some(keyword) = &query.keyword {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(post::Column::Content)))
                    .like(LikeExpr::new(like_pattern(keyword)).escape('\\')),
            );
        }

        select = match query.sort {
            PostSort::Top => select
                .order_by_desc(post::Column::Upvotes)
                .order_by_desc(post::Column::SubmittedAt),
            PostSort::Newest => select.order_by_desc(post::Column::SubmittedAt),
            PostSort::Oldest => select.order_by_asc(post::Column::SubmittedAt),
        };

        let result = select
            .offset(query.offset)
            .limit(query.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_by_user(
        &self,
        user_id: Uuid,
        status: Option<PostStatus>,
    ) -> Result<u64, RepoError> {
        let mut select = PostEntity::find().filter(post::Column::CreatedBy.eq(user_id));
        if let Some(status) = status {
            select = select.filter(post::Column::Status.eq(post::Status::from(status)));
        }

        select.count(&self.db).await.map_err(map_db_err)
    }

    async fn apply_review(&self, post_id: Uuid, review: &Review) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let mut active = post::ActiveModel {
            id: Set(post_id),
            status: Set(review.status.into()),
            reviewed_at: Set(Some(review.reviewed_at.into())),
            review_msg: Set(Some(review.message.clone())),
            ..Default::default()
        };

        if review.status == PostStatus::Declined {
            ReportEntity::delete_many()
                .filter(post_report::Column::PostId.eq(post_id))
                .exec(&txn)
                .await
                .map_err(map_db_err)?;
            active.report_count = Set(0);
        }

        let model = active.update(&txn).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => RepoError::NotFound,
            other => map_db_err(other),
        })?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(model.into())
    }
}

#[async_trait]
impl ReportRepository for PostgresReportRepository {
    async fn exists(&self, post_id: Uuid, reporter_id: Uuid) -> Result<bool, RepoError> {
        let count = ReportEntity::find()
            .filter(post_report::Column::PostId.eq(post_id))
            .filter(post_report::Column::ReporterId.eq(reporter_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }

    async fn file(&self, report: PostReport) -> Result<i32, RepoError> {
        let post_id = report.post_id;
        let txn = self.db.begin().await.map_err(map_db_err)?;

        post_report::ActiveModel::from(report)
            .insert(&txn)
            .await
            .map_err(map_db_err)?;

        let result = PostEntity::update_many()
            .col_expr(
                post::Column::ReportCount,
                Expr::col(post::Column::ReportCount).add(1),
            )
            .filter(post::Column::Id.eq(post_id))
            .filter(post::Column::Status.eq(post::Status::Approved))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::Stale("Only approved posts can be reported".into()));
        }

        let post = PostEntity::find_by_id(post_id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(post.report_count)
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<PostReport>, RepoError> {
        let result = ReportEntity::find()
            .filter(post_report::Column::PostId.eq(post_id))
            .order_by_asc(post_report::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl VoteRepository for PostgresVoteRepository {
    async fn find(&self, user_id: Uuid, post_id: Uuid) -> Result<Option<UserVote>, RepoError> {
        let result = VoteEntity::find()
            .filter(user_vote::Column::UserId.eq(user_id))
            .filter(user_vote::Column::PostId.eq(post_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn apply(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        change: &VoteChange,
    ) -> Result<(), RepoError> {
        let stale = || RepoError::Constraint("Vote changed concurrently".into());
        let txn = self.db.begin().await.map_err(map_db_err)?;

        match (change.previous, change.current) {
            (None, None) => return Ok(()),
            (None, Some(vote_type)) => {
                user_vote::ActiveModel::from(UserVote::new(user_id, post_id, vote_type))
                    .insert(&txn)
                    .await
                    .map_err(map_db_err)?;
            }
            (Some(previous), None) => {
                let result = VoteEntity::delete_many()
                    .filter(user_vote::Column::UserId.eq(user_id))
                    .filter(user_vote::Column::PostId.eq(post_id))
                    .filter(user_vote::Column::VoteType.eq(user_vote::VoteType::from(previous)))
                    .exec(&txn)
                    .await
                    .map_err(map_db_err)?;
                if result.rows_affected == 0 {
                    return Err(stale());
                }
            }
            (Some(previous), Some(current)) => {
                let now: DateTimeWithTimeZone = Utc::now().into();
                let result = VoteEntity::update_many()
                    .col_expr(
                        user_vote::Column::VoteType,
                        Expr::value(user_vote::VoteType::from(current)),
                    )
                    .col_expr(user_vote::Column::UpdatedAt, Expr::value(now))
                    .filter(user_vote::Column::UserId.eq(user_id))
                    .filter(user_vote::Column::PostId.eq(post_id))
                    .filter(user_vote::Column::VoteType.eq(user_vote::VoteType::from(previous)))
                    .exec(&txn)
                    .await
                    .map_err(map_db_err)?;
                if result.rows_affected == 0 {
                    return Err(stale());
                }
            }
        }

        let tally = PostEntity::update_many()
            .col_expr(
                post::Column::Upvotes,
                Expr::col(post::Column::Upvotes).add(change.upvote_delta()),
            )
            .col_expr(
                post::Column::Downvotes,
                Expr::col(post::Column::Downvotes).add(change.downvote_delta()),
            )
            .filter(post::Column::Id.eq(post_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let points = UserEntity::update_many()
            .col_expr(
                user::Column::Points,
                Expr::col(user::Column::Points).add(change.points_delta()),
            )
            .filter(user::Column::Id.eq(user_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if tally.rows_affected == 0 || points.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, RepoError> {
        VoteEntity::find()
            .filter(user_vote::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<UserVote>, RepoError> {
        let result = VoteEntity::find()
            .filter(user_vote::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl BadgeRepository for PostgresBadgeRepository {
    async fn exists(&self, user_id: Uuid, badge: Badge) -> Result<bool, RepoError> {
        let count = BadgeEntity::find()
            .filter(user_badge::Column::UserId.eq(user_id))
            .filter(user_badge::Column::Badge.eq(badge.code()))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }

    async fn award(&self, badge: UserBadge) -> Result<UserBadge, RepoError> {
        user_badge::ActiveModel::from(badge.clone())
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(badge)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<UserBadge>, RepoError> {
        let result = BadgeEntity::find()
            .filter(user_badge::Column::UserId.eq(user_id))
            .order_by_asc(user_badge::Column::AwardedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        result.into_iter().map(UserBadge::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("student@example.com"), "s***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("100% Fun_Day"), "%100\\% fun\\_day%");
    }
}
