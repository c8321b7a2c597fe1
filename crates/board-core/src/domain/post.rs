use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

pub const MAX_CATEGORY_LEN: usize = 50;
pub const MAX_CONTENT_LEN: usize = 2000;
pub const MAX_REVIEW_MSG_LEN: usize = 200;

/// Moderation status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostStatus {
    Pending,
    Approved,
    Declined,
    /// Published by an administrator, never enters the moderation queue.
    #[serde(rename = "admin")]
    Admin,
}

impl PostStatus {
    pub const ALL: [PostStatus; 4] = [
        PostStatus::Pending,
        PostStatus::Approved,
        PostStatus::Declined,
        PostStatus::Admin,
    ];

    /// Statuses shown on the public feed.
    pub const VISIBLE: [PostStatus; 2] = [PostStatus::Approved, PostStatus::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Pending => "Pending",
            PostStatus::Approved => "Approved",
            PostStatus::Declined => "Declined",
            PostStatus::Admin => "admin",
        }
    }

    pub fn is_visible(&self) -> bool {
        Self::VISIBLE.contains(self)
    }

    /// Whether a post in this status may move to `to`.
    ///
    /// Pending -> Approved | Declined, Approved -> Declined, Admin -> Declined.
    /// Declined is terminal.
    pub fn can_transition_to(&self, to: PostStatus) -> bool {
        matches!(
            (self, to),
            (PostStatus::Pending, PostStatus::Approved)
                | (PostStatus::Pending, PostStatus::Declined)
                | (PostStatus::Approved, PostStatus::Declined)
                | (PostStatus::Admin, PostStatus::Declined)
        )
    }

    pub fn transition(self, to: PostStatus) -> Result<PostStatus, DomainError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(DomainError::InvalidTransition { from: self, to })
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(PostStatus::Pending),
            "approved" => Ok(PostStatus::Approved),
            "declined" => Ok(PostStatus::Declined),
            "admin" => Ok(PostStatus::Admin),
            other => Err(DomainError::Validation(format!("Unknown post status '{other}'"))),
        }
    }
}

/// Post entity - a feedback submission or an official admin post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub created_by: Uuid,
    pub category: String,
    pub content: String,
    pub status: PostStatus,
    pub upvotes: i32,
    pub downvotes: i32,
    pub report_count: i32,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_msg: Option<String>,
}

impl Post {
    /// Create a new post owned by `created_by` in the given initial status.
    pub fn new(created_by: Uuid, draft: PostDraft, status: PostStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_by,
            category: draft.category,
            content: draft.content,
            status,
            upvotes: 0,
            downvotes: 0,
            report_count: 0,
            submitted_at: Utc::now(),
            reviewed_at: None,
            review_msg: None,
        }
    }

    pub fn score(&self) -> i32 {
        self.upvotes - self.downvotes
    }
}

/// Validated category and content of a new post.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub category: String,
    pub content: String,
}

impl PostDraft {
    pub fn parse(category: &str, content: &str) -> Result<Self, DomainError> {
        let category = category.trim();
        let content = content.trim();

        if category.is_empty() {
            return Err(DomainError::Validation("Category is required".into()));
        }
        if category.chars().count() > MAX_CATEGORY_LEN {
            return Err(DomainError::Validation(format!(
                "Category must be at most {MAX_CATEGORY_LEN} characters"
            )));
        }
        if content.is_empty() {
            return Err(DomainError::Validation("Content is required".into()));
        }
        if content.chars().count() > MAX_CONTENT_LEN {
            return Err(DomainError::Validation(format!(
                "Content must be at most {MAX_CONTENT_LEN} characters"
            )));
        }

        Ok(Self {
            category: category.to_string(),
            content: content.to_string(),
        })
    }
}

/// A moderation decision to persist against a post.
#[derive(Debug, Clone)]
pub struct Review {
    pub status: PostStatus,
    pub reviewed_at: DateTime<Utc>,
    pub message: String,
}

impl Review {
    pub fn approve(message: Option<String>) -> Result<Self, DomainError> {
        Self::build(
            PostStatus::Approved,
            message,
            "Post approved - the post is now visible to all users.",
        )
    }

    pub fn decline(message: Option<String>) -> Result<Self, DomainError> {
        Self::build(
            PostStatus::Declined,
            message,
            "Post declined - the post will not be shown to users.",
        )
    }

    pub fn auto_decline(report_count: i32) -> Self {
        Self {
            status: PostStatus::Declined,
            reviewed_at: Utc::now(),
            message: format!("Post declined automatically after {report_count} reports"),
        }
    }

    fn build(
        status: PostStatus,
        message: Option<String>,
        default: &str,
    ) -> Result<Self, DomainError> {
        let message = match message.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => default.to_string(),
        };
        if message.chars().count() > MAX_REVIEW_MSG_LEN {
            return Err(DomainError::Validation(format!(
                "Review message must be at most {MAX_REVIEW_MSG_LEN} characters"
            )));
        }

        Ok(Self {
            status,
            reviewed_at: Utc::now(),
            message,
        })
    }
}

/// Sort order for post searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostSort {
    /// Highest upvotes first, newest breaking ties.
    #[default]
    Top,
    Newest,
    Oldest,
}

impl FromStr for PostSort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(PostSort::Top),
            "newest" => Ok(PostSort::Newest),
            "oldest" => Ok(PostSort::Oldest),
            other => Err(DomainError::Validation(format!("Unknown sort order '{other}'"))),
        }
    }
}

/// Search and filter parameters for listing posts.
#[derive(Debug, Clone)]
pub struct PostQuery {
    pub category: Option<String>,
    /// Empty means "any status".
    pub statuses: Vec<PostStatus>,
    /// Case-insensitive substring of the content.
    pub keyword: Option<String>,
    pub sort: PostSort,
    pub limit: u64,
    pub offset: u64,
}

impl PostQuery {
    pub const DEFAULT_LIMIT: u64 = 50;
    pub const MAX_LIMIT: u64 = 100;

    /// Whether `post` satisfies every filter of the query.
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(category) = &self.category {
            if &post.category != category {
                return false;
            }
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&post.status) {
            return false;
        }
        if let Some(keyword) = &self.keyword {
            if !post
                .content
                .to_lowercase()
                .contains(&keyword.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            category: None,
            statuses: Vec::new(),
            keyword: None,
            sort: PostSort::default(),
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}
