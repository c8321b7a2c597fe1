//! Moderation and account management handlers. Every route requires an admin.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use board_core::domain::{PostDraft, Role};
use board_shared::ApiResponse;
use board_shared::dto::{
    CreateAccountRequest, CreateAccountResponse, PostReportResponse, PostResponse,
    ReviewRequest, SubmitPostRequest,
};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/admin/users
pub async fn create_account(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateAccountRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let role = match req.role.as_deref() {
        Some(raw) => raw.parse::<Role>()?,
        None => Role::User,
    };

    let (user, temporary_password) = state
        .board
        .create_account(
            &identity.actor(),
            &req.email,
            req.name.as_deref(),
            role,
            state.passwords.as_ref(),
        )
        .await?;

    Ok(HttpResponse::Created().json(CreateAccountResponse {
        user: views::user(&user),
        temporary_password,
    }))
}

/// POST /api/admin/posts
pub async fn publish(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<SubmitPostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let draft = PostDraft::parse(&req.category, &req.content)?;
    let actor = identity.actor();

    let post = state.board.publish_admin_post(&actor, draft).await?;

    Ok(HttpResponse::Created().json(views::post(post, &actor, None)))
}

/// GET /api/admin/posts/pending
pub async fn pending(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let actor = identity.actor();

    let posts: Vec<PostResponse> = state
        .board
        .pending_queue(&actor)
        .await?
        .into_iter()
        .map(|post| views::post(post, &actor, None))
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// POST /api/admin/posts/{id}/approve
pub async fn approve(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: Option<web::Json<ReviewRequest>>,
) -> AppResult<HttpResponse> {
    let actor = identity.actor();
    let message = body.and_then(|b| b.into_inner().message);

    let post = state
        .board
        .approve(&actor, path.into_inner(), message)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        views::post(post, &actor, None),
        "Post approved",
    )))
}

/// POST /api/admin/posts/{id}/decline
pub async fn decline(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: Option<web::Json<ReviewRequest>>,
) -> AppResult<HttpResponse> {
    let actor = identity.actor();
    let message = body.and_then(|b| b.into_inner().message);

    let post = state
        .board
        .decline(&actor, path.into_inner(), message)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        views::post(post, &actor, None),
        "Post declined",
    )))
}

/// GET /api/admin/posts/{id}/reports
pub async fn reports(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let reports: Vec<PostReportResponse> = state
        .board
        .reports_for(&identity.actor(), path.into_inner())
        .await?
        .into_iter()
        .map(views::post_report)
        .collect();

    Ok(HttpResponse::Ok().json(reports))
}
