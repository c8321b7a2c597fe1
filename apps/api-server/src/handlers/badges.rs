//! Badge handlers.

use actix_web::{HttpResponse, web};

use board_core::domain::Badge;
use board_shared::dto::BadgeResponse;

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/badges
pub async fn catalog(_identity: Identity) -> HttpResponse {
    let badges: Vec<BadgeResponse> = Badge::ALL.into_iter().map(views::badge).collect();
    HttpResponse::Ok().json(badges)
}

/// GET /api/badges/mine
pub async fn mine(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let badges: Vec<BadgeResponse> = state
        .board
        .badges_for(identity.user_id)
        .await?
        .iter()
        .map(views::awarded_badge)
        .collect();

    Ok(HttpResponse::Ok().json(badges))
}
