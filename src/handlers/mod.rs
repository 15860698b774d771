pub mod cron;
pub mod settings;
pub mod special_days;
pub mod unions;

use actix_web::{web, HttpResponse};
use serde_json::json;

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))

        .route("/api/unions", web::get().to(unions::list_unions))
        .route("/api/unions", web::post().to(unions::create_union))
        .route("/api/unions/{id}", web::get().to(unions::get_union))
        .route("/api/unions/{id}", web::put().to(unions::update_union))
        .route("/api/unions/{id}", web::delete().to(unions::delete_union))

        .route("/api/special-days", web::get().to(special_days::list_special_days))
        .route("/api/special-days", web::post().to(special_days::create_special_day))
        .route("/api/special-days/bulk", web::post().to(special_days::bulk_create_special_days))
        .route("/api/special-days/{id}", web::get().to(special_days::get_special_day))
        .route("/api/special-days/{id}", web::put().to(special_days::update_special_day))
        .route("/api/special-days/{id}", web::delete().to(special_days::delete_special_day))

        .route("/api/cron", web::get().to(cron::run_cron))
        .route("/api/settings/bot-updates", web::get().to(settings::bot_updates));
}
