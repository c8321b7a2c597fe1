use uuid::Uuid;

use super::BoardService;
use crate::domain::{Badge, BadgeTrack, PostStatus, UserBadge};
use crate::error::{DomainError, RepoError};

impl BoardService {
    pub async fn badges_for(&self, user_id: Uuid) -> Result<Vec<UserBadge>, DomainError> {
        Ok(self.badges.find_by_user(user_id).await?)
    }

    /// Award every badge of `track` the user has reached but does not hold yet.
    ///
    /// Returns the badges awarded by this call.
    pub(crate) async fn evaluate_badges(
        &self,
        user_id: Uuid,
        track: BadgeTrack,
    ) -> Result<Vec<Badge>, DomainError> {
        let count = match track {
            BadgeTrack::Voting => self.votes.count_by_user(user_id).await?,
            BadgeTrack::Submissions => self.posts.count_by_user(user_id, None).await?,
            BadgeTrack::Approvals => {
                self.posts
                    .count_by_user(user_id, Some(PostStatus::Approved))
                    .await?
            }
        };

        let mut awarded = Vec::new();
        for badge in Badge::earned(track, count) {
            if self.badges.exists(user_id, badge).await? {
                continue;
            }

            match self.badges.award(UserBadge::new(user_id, badge)).await {
                Ok(_) => {
                    tracing::info!(user_id = %user_id, badge = badge.code(), "Badge awarded");
                    awarded.push(badge);
                }
                // Lost a race with a concurrent award.
                Err(RepoError::Constraint(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(awarded)
    }
}
