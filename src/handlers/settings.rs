use actix_web::{web, HttpResponse};

use crate::state::AppState;

/// Recent bot updates, so admins can find the chat id of a freshly added group.
pub async fn bot_updates(state: web::Data<AppState>) -> HttpResponse {
    let updates = state.telegram.bot_updates().await;
    HttpResponse::Ok().json(updates)
}
