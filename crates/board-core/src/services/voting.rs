use std::collections::HashMap;

use uuid::Uuid;

use super::{BoardService, VoteReceipt};
use crate::domain::{Actor, BadgeTrack, VoteChange, VoteType};
use crate::error::{DomainError, RepoError};

impl BoardService {
    /// Cast a vote. Repeating the held vote retracts it; the opposite vote flips it.
    pub async fn vote(
        &self,
        actor: &Actor,
        post_id: Uuid,
        cast: VoteType,
    ) -> Result<VoteReceipt, DomainError> {
        let post = self.load_post(post_id).await?;
        if !post.status.is_visible() {
            return Err(DomainError::Validation(
                "Only published posts can be voted on".into(),
            ));
        }

        let previous = self
            .votes
            .find(actor.user_id, post_id)
            .await?
            .map(|vote| vote.vote_type);
        let change = VoteChange::resolve(previous, cast);

        self.votes
            .apply(actor.user_id, post_id, &change)
            .await
            .map_err(|e| match e {
                RepoError::Constraint(_) => DomainError::Duplicate("Vote already recorded".into()),
                other => other.into(),
            })?;

        tracing::debug!(
            post_id = %post_id,
            user_id = %actor.user_id,
            previous = ?change.previous,
            current = ?change.current,
            "Vote applied"
        );

        let post = self.load_post(post_id).await?;
        let voter = self
            .users
            .find_by_id(actor.user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(actor.user_id))?;
        let awarded = self
            .evaluate_badges(actor.user_id, BadgeTrack::Voting)
            .await?;

        Ok(VoteReceipt {
            post_id,
            vote: change.current,
            upvotes: post.upvotes,
            downvotes: post.downvotes,
            points: voter.points,
            awarded,
        })
    }

    /// Every vote the caller currently holds, keyed by post.
    pub async fn votes_by(&self, actor: &Actor) -> Result<HashMap<Uuid, VoteType>, DomainError> {
        let votes = self.votes.find_by_user(actor.user_id).await?;

        Ok(votes
            .into_iter()
            .map(|vote| (vote.post_id, vote.vote_type))
            .collect())
    }
}
