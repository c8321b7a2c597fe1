//! Feedback post handlers for regular users.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use board_core::domain::{Actor, Post, PostDraft, PostQuery, PostSort, PostStatus, VoteType};
use board_shared::dto::{
    PostResponse, PostSearchParams, ReportRequest, SubmitPostRequest, VoteRequest,
};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn build_query(params: PostSearchParams) -> AppResult<PostQuery> {
    let statuses = match params.status.as_deref() {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<PostStatus>())
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    let sort = match params.sort.as_deref() {
        Some(raw) => raw.parse::<PostSort>()?,
        None => PostSort::default(),
    };

    Ok(PostQuery {
        category: non_blank(params.category),
        statuses,
        keyword: non_blank(params.q),
        sort,
        limit: params.limit.unwrap_or(PostQuery::DEFAULT_LIMIT),
        offset: params.offset.unwrap_or(0),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn render(state: &AppState, actor: &Actor, posts: Vec<Post>) -> AppResult<Vec<PostResponse>> {
    let votes: HashMap<Uuid, VoteType> = state.board.votes_by(actor).await?;

    Ok(posts
        .into_iter()
        .map(|post| {
            let my_vote = votes.get(&post.id).copied();
            views::post(post, actor, my_vote)
        })
        .collect())
}

/// POST /api/posts
pub async fn submit(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<SubmitPostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let draft = PostDraft::parse(&req.category, &req.content)?;
    let actor = identity.actor();

    let post = state.board.submit_feedback(&actor, draft).await?;

    Ok(HttpResponse::Created().json(views::post(post, &actor, None)))
}

/// GET /api/posts?category=&status=&q=&sort=&limit=&offset=
pub async fn search(
    state: web::Data<AppState>,
    identity: Identity,
    params: web::Query<PostSearchParams>,
) -> AppResult<HttpResponse> {
    let actor = identity.actor();
    let query = build_query(params.into_inner())?;

    let posts = state.board.search(&actor, query).await?;

    Ok(HttpResponse::Ok().json(render(&state, &actor, posts).await?))
}

/// GET /api/posts/mine
pub async fn mine(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let actor = identity.actor();

    let posts = state.board.posts_by_owner(&actor).await?;

    Ok(HttpResponse::Ok().json(render(&state, &actor, posts).await?))
}

/// GET /api/posts/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let actor = identity.actor();

    let post = state.board.get_post(&actor, path.into_inner()).await?;
    let mut rendered = render(&state, &actor, vec![post]).await?;

    Ok(HttpResponse::Ok().json(rendered.pop()))
}

/// POST /api/posts/{id}/vote
pub async fn vote(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<VoteRequest>,
) -> AppResult<HttpResponse> {
    let cast: VoteType = body.vote_type.parse()?;

    let receipt = state
        .board
        .vote(&identity.actor(), path.into_inner(), cast)
        .await?;

    Ok(HttpResponse::Ok().json(views::vote(receipt)))
}

/// POST /api/posts/{id}/report
pub async fn report(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<ReportRequest>,
) -> AppResult<HttpResponse> {
    let receipt = state
        .board
        .report(&identity.actor(), path.into_inner(), &body.reason)
        .await?;

    Ok(HttpResponse::Created().json(views::report(receipt)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_parses_filters() {
        let query = build_query(PostSearchParams {
            category: Some(" Facilities ".into()),
            status: Some("approved, admin".into()),
            q: Some("  ".into()),
            sort: Some("newest".into()),
            limit: Some(10),
            offset: None,
        })
        .unwrap();

        assert_eq!(query.category.as_deref(), Some("Facilities"));
        assert_eq!(query.statuses, vec![PostStatus::Approved, PostStatus::Admin]);
        assert!(query.keyword.is_none());
        assert_eq!(query.sort, PostSort::Newest);
        assert_eq!((query.limit, query.offset), (10, 0));
    }

    #[test]
    fn test_build_query_rejects_unknown_values() {
        let params = PostSearchParams {
            status: Some("archived".into()),
            ..PostSearchParams::default()
        };

        assert!(build_query(params).is_err());
    }
}
