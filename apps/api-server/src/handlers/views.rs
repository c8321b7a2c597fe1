//! Domain to wire conversions.

use board_core::domain::{Actor, Badge, Post, PostReport, User, UserBadge, VoteType};
use board_core::services::{ReportReceipt, VoteReceipt};
use board_shared::dto::{
    BadgeResponse, PostReportResponse, PostResponse, ReportResponse, UserResponse, VoteResponse,
};

pub fn user(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role.to_string(),
        points: user.points,
        created_at: user.created_at,
    }
}

/// Submissions are anonymous: the author is only revealed to the owner and admins.
pub fn post(post: Post, viewer: &Actor, my_vote: Option<VoteType>) -> PostResponse {
    let reveal_author = viewer.is_admin() || post.created_by == viewer.user_id;

    PostResponse {
        id: post.id,
        score: post.score(),
        status: post.status.to_string(),
        upvotes: post.upvotes,
        downvotes: post.downvotes,
        submitted_at: post.submitted_at,
        reviewed_at: post.reviewed_at,
        review_msg: post.review_msg,
        created_by: reveal_author.then_some(post.created_by),
        report_count: viewer.is_admin().then_some(post.report_count),
        my_vote: my_vote.map(|v| v.to_string()),
        category: post.category,
        content: post.content,
    }
}

pub fn badge(badge: Badge) -> BadgeResponse {
    BadgeResponse {
        code: badge.code().to_string(),
        name: badge.name().to_string(),
        description: badge.description(),
        threshold: badge.threshold(),
        awarded_at: None,
    }
}

pub fn awarded_badge(award: &UserBadge) -> BadgeResponse {
    BadgeResponse {
        awarded_at: Some(award.awarded_at),
        ..badge(award.badge)
    }
}

pub fn vote(receipt: VoteReceipt) -> VoteResponse {
    VoteResponse {
        post_id: receipt.post_id,
        vote_type: receipt.vote.map(|v| v.to_string()),
        upvotes: receipt.upvotes,
        downvotes: receipt.downvotes,
        points: receipt.points,
        badges_awarded: receipt.awarded.into_iter().map(badge).collect(),
    }
}

pub fn report(receipt: ReportReceipt) -> ReportResponse {
    ReportResponse {
        post_id: receipt.post_id,
        report_count: receipt.report_count,
        status: receipt.status.to_string(),
        auto_declined: receipt.auto_declined,
    }
}

pub fn post_report(report: PostReport) -> PostReportResponse {
    PostReportResponse {
        id: report.id,
        reporter_id: report.reporter_id,
        reason: report.reason,
        created_at: report.created_at,
    }
}
