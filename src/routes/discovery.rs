use actix_web::{web, HttpResponse};

use crate::models::{DiscoverResponse, UserId};
use crate::routes::{ApiError, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/discover/{user_id}", web::get().to(next_candidates));
}

/// Next page of candidate profiles
///
/// GET /api/v1/discover/{user_id}
///
/// Free users who reached the daily swipe quota get `429 quota_exceeded`.
async fn next_candidates(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = UserId::parse(&path)?;

    let profiles = state.core.discovery.next_candidates(user_id).await?;

    Ok(HttpResponse::Ok().json(DiscoverResponse {
        total_results: profiles.len(),
        profiles,
    }))
}
