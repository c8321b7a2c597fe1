use uuid::Uuid;

use super::{BoardService, ReportReceipt};
use crate::domain::{Actor, PostReport, PostStatus, Review};
use crate::error::{DomainError, RepoError};

impl BoardService {
    /// Report an approved post.
    ///
    /// Once the report count reaches the policy threshold the post is declined,
    /// which clears its reports.
    pub async fn report(
        &self,
        actor: &Actor,
        post_id: Uuid,
        reason: &str,
    ) -> Result<ReportReceipt, DomainError> {
        let post = self.load_post(post_id).await?;
        if post.status != PostStatus::Approved {
            return Err(DomainError::Validation(
                "Only approved posts can be reported".into(),
            ));
        }
        if post.created_by == actor.user_id {
            return Err(DomainError::Validation(
                "You cannot report your own post".into(),
            ));
        }

        let report = PostReport::new(post_id, actor.user_id, reason)?;
        if self.reports.exists(post_id, actor.user_id).await? {
            return Err(DomainError::AlreadyReported);
        }

        let report_count = self.reports.file(report).await.map_err(|e| match e {
            RepoError::Constraint(_) => DomainError::AlreadyReported,
            other => other.into(),
        })?;

        tracing::info!(post_id = %post_id, report_count, "Post reported");

        if !self.policy.reports.should_auto_decline(report_count) {
            return Ok(ReportReceipt {
                post_id,
                report_count,
                status: post.status,
                auto_declined: false,
            });
        }

        let review = Review::auto_decline(report_count);
        post.status.transition(review.status)?;
        let declined = self.posts.apply_review(post_id, &review).await?;

        tracing::warn!(
            post_id = %post_id,
            threshold = self.policy.reports.threshold,
            "Post declined by report threshold"
        );

        Ok(ReportReceipt {
            post_id,
            report_count: declined.report_count,
            status: declined.status,
            auto_declined: true,
        })
    }

    pub async fn reports_for(
        &self,
        actor: &Actor,
        post_id: Uuid,
    ) -> Result<Vec<PostReport>, DomainError> {
        actor.require_admin()?;
        self.load_post(post_id).await?;

        Ok(self.reports.find_by_post(post_id).await?)
    }
}
