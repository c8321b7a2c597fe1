use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

pub const MAX_REASON_LEN: usize = 500;

/// A flag raised by a user against a post. One per (post, reporter).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostReport {
    pub id: Uuid,
    pub post_id: Uuid,
    pub reporter_id: Uuid,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl PostReport {
    pub fn new(post_id: Uuid, reporter_id: Uuid, reason: &str) -> Result<Self, DomainError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DomainError::Validation("A reason is required".into()));
        }
        if reason.chars().count() > MAX_REASON_LEN {
            return Err(DomainError::Validation(format!(
                "Reason must be at most {MAX_REASON_LEN} characters"
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            post_id,
            reporter_id,
            reason: reason.to_string(),
            created_at: Utc::now(),
        })
    }
}

/// When accumulated reports take a post off the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPolicy {
    pub threshold: i32,
}

impl ReportPolicy {
    pub const DEFAULT_THRESHOLD: i32 = 3;

    pub fn new(threshold: i32) -> Self {
        Self {
            threshold: threshold.max(1),
        }
    }

    pub fn should_auto_decline(&self, report_count: i32) -> bool {
        report_count >= self.threshold
    }
}

impl Default for ReportPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold_is_three() {
        let policy = ReportPolicy::default();
        assert!(!policy.should_auto_decline(2));
        assert!(policy.should_auto_decline(3));
        assert!(policy.should_auto_decline(4));
    }

    #[test]
    fn test_threshold_is_at_least_one() {
        assert_eq!(ReportPolicy::new(0).threshold, 1);
    }

    #[test]
    fn test_reason_is_required() {
        assert!(PostReport::new(Uuid::new_v4(), Uuid::new_v4(), "  ").is_err());
        let report = PostReport::new(Uuid::new_v4(), Uuid::new_v4(), " spam ").unwrap();
        assert_eq!(report.reason, "spam");
    }
}
