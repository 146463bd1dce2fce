use actix_web::{web, HttpResponse};

use crate::models::{MatchId, PostMessageRequest, UserId, UserQuery};
use crate::routes::{validate, ApiError, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/rooms", web::get().to(list_rooms))
        .route("/rooms/{room_id}", web::delete().to(delete_room))
        .route("/rooms/{room_id}/messages", web::post().to(post_message))
        .route("/rooms/{room_id}/messages", web::get().to(list_messages));
}

/// GET /api/v1/rooms?userId={userId}
async fn list_rooms(
    state: web::Data<AppState>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse, ApiError> {
    validate(&*query)?;
    let user_id = UserId::parse(&query.user_id)?;

    let rooms = state.core.rooms.list_rooms(user_id).await?;
    Ok(HttpResponse::Ok().json(rooms))
}

/// DELETE /api/v1/rooms/{room_id}?userId={userId}
///
/// Always 204: deleting a room the user does not hold changes nothing.
async fn delete_room(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse, ApiError> {
    validate(&*query)?;
    let room_id = MatchId::parse(&path)?;
    let user_id = UserId::parse(&query.user_id)?;

    state.core.rooms.delete_room(room_id, user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/v1/rooms/{room_id}/messages
///
/// Request body:
/// ```json
/// {
///   "senderId": "uuid",
///   "content": "hi!"
/// }
/// ```
async fn post_message(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<PostMessageRequest>,
) -> Result<HttpResponse, ApiError> {
    validate(&*req)?;
    let room_id = MatchId::parse(&path)?;
    let sender = UserId::parse(&req.sender_id)?;

    let message = state
        .core
        .rooms
        .post_message(room_id, sender, &req.content)
        .await?;

    Ok(HttpResponse::Created().json(message))
}

/// GET /api/v1/rooms/{room_id}/messages
async fn list_messages(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let room_id = MatchId::parse(&path)?;

    let messages = state.core.rooms.list_messages(room_id).await?;
    Ok(HttpResponse::Ok().json(messages))
}
