mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;
mod state;
mod store;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::NormalizePath;
use actix_web::{web, App, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use services::clock::SystemClock;
use services::reminder::ReminderJob;
use services::scheduler::ReminderScheduler;
use services::telegram::TelegramBot;
use state::AppState;
use store::SqliteStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    let pool = db::init_pool(&config.database_url)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, format!("Failed to initialize SQLite pool: {}", e)))?;
    let store = SqliteStore::new(pool);

    let telegram = Arc::new(TelegramBot::new(
        config.telegram_bot_token.as_deref(),
        &config.telegram_api_url,
    ));
    if !telegram.is_configured() {
        warn!("TELEGRAM_BOT_TOKEN is not set; every reminder delivery will fail");
    }

    let reminder_job = ReminderJob::new(
        Arc::new(store.clone()),
        telegram.clone(),
        Arc::new(SystemClock),
        config.dispatch_concurrency,
    );
    let scheduler = ReminderScheduler::start(reminder_job.clone(), config.reminder_schedule.clone());

    let app_state = web::Data::new(AppState::new(store, telegram, reminder_job));

    info!("Listening on 0.0.0.0:{}", config.port);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::trim())
            .wrap(Cors::permissive())
            .app_data(app_state.clone())
            .configure(handlers::configure)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await;

    scheduler.stop().await;
    server
}
