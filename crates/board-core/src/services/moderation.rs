use uuid::Uuid;

use super::BoardService;
use crate::domain::{Actor, BadgeTrack, Post, PostDraft, PostQuery, PostSort, PostStatus, Review};
use crate::error::DomainError;

impl BoardService {
    /// Submit feedback for moderation. Other users never see the author.
    pub async fn submit_feedback(
        &self,
        actor: &Actor,
        draft: PostDraft,
    ) -> Result<Post, DomainError> {
        let post = self
            .posts
            .save(Post::new(actor.user_id, draft, PostStatus::Pending))
            .await?;

        tracing::info!(post_id = %post.id, category = %post.category, "Feedback submitted");

        self.evaluate_badges(actor.user_id, BadgeTrack::Submissions)
            .await?;
        Ok(post)
    }

    /// Publish an official post that skips the moderation queue.
    pub async fn publish_admin_post(
        &self,
        actor: &Actor,
        draft: PostDraft,
    ) -> Result<Post, DomainError> {
        actor.require_admin()?;

        let post = self
            .posts
            .save(Post::new(actor.user_id, draft, PostStatus::Admin))
            .await?;

        tracing::info!(post_id = %post.id, admin_id = %actor.user_id, "Admin post published");
        Ok(post)
    }

    pub async fn approve(
        &self,
        actor: &Actor,
        post_id: Uuid,
        message: Option<String>,
    ) -> Result<Post, DomainError> {
        let post = self
            .review(actor, post_id, Review::approve(message)?)
            .await?;

        self.evaluate_badges(post.created_by, BadgeTrack::Approvals)
            .await?;
        Ok(post)
    }

    /// Decline a post. Any reports against it are cleared.
    pub async fn decline(
        &self,
        actor: &Actor,
        post_id: Uuid,
        message: Option<String>,
    ) -> Result<Post, DomainError> {
        self.review(actor, post_id, Review::decline(message)?).await
    }

    async fn review(
        &self,
        actor: &Actor,
        post_id: Uuid,
        review: Review,
    ) -> Result<Post, DomainError> {
        actor.require_admin()?;

        let post = self.load_post(post_id).await?;
        post.status.transition(review.status)?;

        let updated = self.posts.apply_review(post_id, &review).await?;
        tracing::info!(
            post_id = %post_id,
            admin_id = %actor.user_id,
            from = %post.status,
            to = %updated.status,
            "Post reviewed"
        );
        Ok(updated)
    }

    /// Fetch a single post. Hidden posts are only shown to their owner and admins.
    pub async fn get_post(&self, actor: &Actor, post_id: Uuid) -> Result<Post, DomainError> {
        let post = self.load_post(post_id).await?;

        if post.status.is_visible() || post.created_by == actor.user_id || actor.is_admin() {
            Ok(post)
        } else {
            Err(DomainError::post_not_found(post_id))
        }
    }

    /// Search posts by category, status and keyword.
    ///
    /// Regular users only see visible posts; asking for any other status is forbidden.
    pub async fn search(&self, actor: &Actor, query: PostQuery) -> Result<Vec<Post>, DomainError> {
        let mut query = query;
        query.limit = query.limit.clamp(1, PostQuery::MAX_LIMIT);

        if !actor.is_admin() {
            if query.statuses.is_empty() {
                query.statuses = PostStatus::VISIBLE.to_vec();
            } else if query.statuses.iter().any(|s| !s.is_visible()) {
                return Err(DomainError::Forbidden);
            }
        }

        Ok(self.posts.search(&query).await?)
    }

    /// Pending posts, oldest first.
    pub async fn pending_queue(&self, actor: &Actor) -> Result<Vec<Post>, DomainError> {
        actor.require_admin()?;

        let query = PostQuery {
            statuses: vec![PostStatus::Pending],
            sort: PostSort::Oldest,
            limit: PostQuery::MAX_LIMIT,
            ..PostQuery::default()
        };
        Ok(self.posts.search(&query).await?)
    }

    pub async fn posts_by_owner(&self, actor: &Actor) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.find_by_user_id(actor.user_id).await?)
    }
}
