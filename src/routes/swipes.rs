use actix_web::{web, HttpResponse};

use crate::core::SwipeOutcome;
use crate::models::{SwipeRequest, SwipeResponse, UserId};
use crate::routes::{validate, ApiError, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/swipes", web::post().to(swipe));
}

/// Record a swipe
///
/// POST /api/v1/swipes
///
/// Request body:
/// ```json
/// {
///   "userId": "uuid",
///   "targetUserId": "uuid",
///   "liked": true
/// }
/// ```
///
/// The response is the same whether or not a match formed.
async fn swipe(
    state: web::Data<AppState>,
    req: web::Json<SwipeRequest>,
) -> Result<HttpResponse, ApiError> {
    validate(&*req)?;

    let acting = UserId::parse(&req.user_id)?;
    let target = UserId::parse(&req.target_user_id)?;

    let outcome = state.core.engine.swipe(acting, target, req.liked).await?;

    match &outcome {
        SwipeOutcome::Matched { match_id, .. } => {
            tracing::debug!("Swipe {} -> {} completed match {}", acting, target, match_id);
        }
        SwipeOutcome::MatchIncomplete { error, .. } => {
            tracing::warn!("Swipe {} -> {} recorded with incomplete match: {}", acting, target, error);
        }
        SwipeOutcome::Recorded(_) => {}
    }

    Ok(HttpResponse::Ok().json(SwipeResponse {
        message: "Swipe recorded".to_string(),
    }))
}
