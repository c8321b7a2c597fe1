use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// The usage counter a badge is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTrack {
    /// Votes currently held by the user.
    Voting,
    /// Posts the user has submitted, in any status.
    Submissions,
    /// The user's posts that were approved.
    Approvals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    FirstVote,
    ActiveVoter,
    VoteMaster,
    FirstSubmission,
    Contributor,
    ProlificContributor,
    FirstApproval,
    TrustedVoice,
    CommunityPillar,
}

impl Badge {
    pub const ALL: [Badge; 9] = [
        Badge::FirstVote,
        Badge::ActiveVoter,
        Badge::VoteMaster,
        Badge::FirstSubmission,
        Badge::Contributor,
        Badge::ProlificContributor,
        Badge::FirstApproval,
        Badge::TrustedVoice,
        Badge::CommunityPillar,
    ];

    pub fn track(&self) -> BadgeTrack {
        match self {
            Badge::FirstVote | Badge::ActiveVoter | Badge::VoteMaster => BadgeTrack::Voting,
            Badge::FirstSubmission | Badge::Contributor | Badge::ProlificContributor => {
                BadgeTrack::Submissions
            }
            Badge::FirstApproval | Badge::TrustedVoice | Badge::CommunityPillar => {
                BadgeTrack::Approvals
            }
        }
    }

    pub fn threshold(&self) -> u64 {
        match self {
            Badge::FirstVote | Badge::FirstSubmission | Badge::FirstApproval => 1,
            Badge::ActiveVoter | Badge::Contributor | Badge::TrustedVoice => 10,
            Badge::VoteMaster | Badge::ProlificContributor | Badge::CommunityPillar => 50,
        }
    }

    /// Stable identifier used for storage.
    pub fn code(&self) -> &'static str {
        match self {
            Badge::FirstVote => "first_vote",
            Badge::ActiveVoter => "active_voter",
            Badge::VoteMaster => "vote_master",
            Badge::FirstSubmission => "first_submission",
            Badge::Contributor => "contributor",
            Badge::ProlificContributor => "prolific_contributor",
            Badge::FirstApproval => "first_approval",
            Badge::TrustedVoice => "trusted_voice",
            Badge::CommunityPillar => "community_pillar",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Badge::FirstVote => "First Vote",
            Badge::ActiveVoter => "Active Voter",
            Badge::VoteMaster => "Vote Master",
            Badge::FirstSubmission => "First Submission",
            Badge::Contributor => "Contributor",
            Badge::ProlificContributor => "Prolific Contributor",
            Badge::FirstApproval => "First Approval",
            Badge::TrustedVoice => "Trusted Voice",
            Badge::CommunityPillar => "Community Pillar",
        }
    }

    pub fn description(&self) -> String {
        let subject = match self.track() {
            BadgeTrack::Voting => "votes cast",
            BadgeTrack::Submissions => "posts submitted",
            BadgeTrack::Approvals => "posts approved",
        };
        format!("{} {}", self.threshold(), subject)
    }

    /// Badges of `track` whose threshold `count` has reached.
    pub fn earned(track: BadgeTrack, count: u64) -> impl Iterator<Item = Badge> {
        Self::ALL
            .into_iter()
            .filter(move |badge| badge.track() == track && count >= badge.threshold())
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Badge {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|badge| badge.code() == s)
            .ok_or_else(|| DomainError::Validation(format!("Unknown badge '{s}'")))
    }
}

/// A badge held by a user. At most one per (user, badge).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBadge {
    pub id: Uuid,
    pub user_id: Uuid,
    pub badge: Badge,
    pub awarded_at: DateTime<Utc>,
}

impl UserBadge {
    pub fn new(user_id: Uuid, badge: Badge) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            badge,
            awarded_at: Utc::now(),
        }
    }
}
