use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppResult;
use crate::services::reminder::JobRun;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CronQuery {
    delay: Option<String>,
}

/// Manual trigger for the reminder job. `?delay=N` runs it N seconds later in the background.
pub async fn run_cron(query: web::Query<CronQuery>, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let delay = query.delay.as_deref().and_then(parse_delay);

    match state.reminder_job.trigger(delay).await? {
        JobRun::Scheduled { delay_seconds } => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": format!("Cron job {} saniye sonra çalışacak şekilde planlandı.", delay_seconds),
            "isBackground": true
        }))),
        JobRun::Completed(report) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "matched": report.matched,
            "processed": report.processed,
            "results": report.results
        }))),
    }
}

/// Reads the leading digits of `raw` ("1.5" is 1, "10s" is 10).
/// Signed or digit-less input yields `None`, which means "run now".
fn parse_delay(raw: &str) -> Option<u64> {
    let raw = raw.trim_start();
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    let digits_end = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    raw[..digits_end].parse::<u64>().ok()
}
