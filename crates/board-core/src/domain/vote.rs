use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Upvote,
    Downvote,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Upvote => "upvote",
            VoteType::Downvote => "downvote",
        }
    }

    /// Contribution of this vote to the voter's points.
    pub fn weight(&self) -> i32 {
        match self {
            VoteType::Upvote => 1,
            VoteType::Downvote => -1,
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "upvote" | "up" => Ok(VoteType::Upvote),
            "downvote" | "down" => Ok(VoteType::Downvote),
            other => Err(DomainError::Validation(format!("Unknown vote type '{other}'"))),
        }
    }
}

/// A user's standing vote on a post. At most one exists per (user, post).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserVote {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub vote_type: VoteType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserVote {
    pub fn new(user_id: Uuid, post_id: Uuid, vote_type: VoteType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            post_id,
            vote_type,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The effect of casting a vote on top of whatever vote the user already held.
///
/// Casting the held vote again retracts it; casting the other one flips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteChange {
    pub previous: Option<VoteType>,
    pub current: Option<VoteType>,
}

impl VoteChange {
    pub fn resolve(previous: Option<VoteType>, cast: VoteType) -> Self {
        let current = if previous == Some(cast) {
            None
        } else {
            Some(cast)
        };
        Self { previous, current }
    }

    pub fn upvote_delta(&self) -> i32 {
        Self::count(self.current, VoteType::Upvote) - Self::count(self.previous, VoteType::Upvote)
    }

    pub fn downvote_delta(&self) -> i32 {
        Self::count(self.current, VoteType::Downvote)
            - Self::count(self.previous, VoteType::Downvote)
    }

    pub fn points_delta(&self) -> i32 {
        self.current.map_or(0, |v| v.weight()) - self.previous.map_or(0, |v| v.weight())
    }

    pub fn is_retraction(&self) -> bool {
        self.previous.is_some() && self.current.is_none()
    }

    fn count(vote: Option<VoteType>, kind: VoteType) -> i32 {
        i32::from(vote == Some(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::VoteType::{Downvote, Upvote};

    fn deltas(previous: Option<VoteType>, cast: VoteType) -> (Option<VoteType>, i32, i32, i32) {
        let change = VoteChange::resolve(previous, cast);
        (
            change.current,
            change.upvote_delta(),
            change.downvote_delta(),
            change.points_delta(),
        )
    }

    #[test]
    fn test_first_vote() {
        assert_eq!(deltas(None, Upvote), (Some(Upvote), 1, 0, 1));
        assert_eq!(deltas(None, Downvote), (Some(Downvote), 0, 1, -1));
    }

    #[test]
    fn test_same_vote_retracts() {
        assert_eq!(deltas(Some(Upvote), Upvote), (None, -1, 0, -1));
        assert_eq!(deltas(Some(Downvote), Downvote), (None, 0, -1, 1));
        assert!(VoteChange::resolve(Some(Upvote), Upvote).is_retraction());
    }

    #[test]
    fn test_opposite_vote_flips() {
        assert_eq!(deltas(Some(Upvote), Downvote), (Some(Downvote), -1, 1, -2));
        assert_eq!(deltas(Some(Downvote), Upvote), (Some(Upvote), 1, -1, 2));
    }

    #[test]
    fn test_points_track_net_votes_over_any_sequence() {
        let casts = [Upvote, Upvote, Downvote, Downvote, Downvote, Upvote, Downvote];
        let mut held = None;
        let mut points = 0;
        for cast in casts {
            let change = VoteChange::resolve(held, cast);
            points += change.points_delta();
            held = change.current;
            assert_eq!(points, held.map_or(0, |v| v.weight()));
        }
    }
}
