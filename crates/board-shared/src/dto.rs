//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    /// Defaults to the local part of the email.
    #[serde(default)]
    pub name: Option<String>,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub points: i32,
    pub created_at: DateTime<Utc>,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

/// Admin request to open an account for someone else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// `user` or `admin`; defaults to `user`.
    #[serde(default)]
    pub role: Option<String>,
}

/// The new account and the password to hand over to its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountResponse {
    pub user: UserResponse,
    pub temporary_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitPostRequest {
    pub category: String,
    pub content: String,
}

/// Optional note attached to an approve or decline decision.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRequest {
    /// `upvote` or `downvote`.
    pub vote_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    pub reason: String,
}

/// A post as shown to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub category: String,
    pub content: String,
    pub status: String,
    pub upvotes: i32,
    pub downvotes: i32,
    pub score: i32,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_msg: Option<String>,
    /// Only present for admins and the post owner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    /// Only present for admins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_count: Option<i32>,
    /// The caller's current vote on this post, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_vote: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteResponse {
    pub post_id: Uuid,
    /// `None` when the vote was retracted.
    pub vote_type: Option<String>,
    pub upvotes: i32,
    pub downvotes: i32,
    pub points: i32,
    pub badges_awarded: Vec<BadgeResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub post_id: Uuid,
    pub report_count: i32,
    pub status: String,
    pub auto_declined: bool,
}

/// A report as listed for moderators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostReportResponse {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeResponse {
    pub code: String,
    pub name: String,
    pub description: String,
    pub threshold: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awarded_at: Option<DateTime<Utc>>,
}

/// Query string of `GET /posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostSearchParams {
    pub category: Option<String>,
    /// Comma separated list of statuses.
    pub status: Option<String>,
    /// Keyword matched against the content.
    pub q: Option<String>,
    /// `top`, `newest` or `oldest`.
    pub sort: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}
