use actix_web::{web, HttpResponse};

use crate::models::{
    CreateProfileRequest, ProfileId, SubscribePremiumRequest, UpdateProfileRequest, UserId,
};
use crate::routes::{validate, ApiError, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profiles", web::post().to(create_profile))
        .route("/profiles/{profile_id}", web::get().to(get_profile))
        .route("/profiles/{profile_id}", web::put().to(update_profile))
        .route("/premium", web::post().to(subscribe_premium));
}

async fn create_profile(
    state: web::Data<AppState>,
    req: web::Json<CreateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    validate(&*req)?;
    let CreateProfileRequest { user_id, profile } = req.into_inner();
    let user_id = UserId::parse(&user_id)?;

    let profile = state.core.profiles.create_profile(user_id, profile).await?;
    Ok(HttpResponse::Created().json(profile))
}

async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let profile_id = ProfileId::parse(&path)?;

    let profile = state.core.profiles.get_profile(profile_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

async fn update_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    validate(&*req)?;
    let profile_id = ProfileId::parse(&path)?;
    let UpdateProfileRequest { user_id, changes } = req.into_inner();
    let editor = UserId::parse(&user_id)?;

    let profile = state
        .core
        .profiles
        .update_profile(profile_id, editor, changes)
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// POST /api/v1/premium
///
/// Payment is settled upstream; this only records the subscription window.
async fn subscribe_premium(
    state: web::Data<AppState>,
    req: web::Json<SubscribePremiumRequest>,
) -> Result<HttpResponse, ApiError> {
    validate(&*req)?;
    let user_id = UserId::parse(&req.user_id)?;

    state.core.premium.subscribe(user_id, req.expires_at).await?;
    Ok(HttpResponse::NoContent().finish())
}
