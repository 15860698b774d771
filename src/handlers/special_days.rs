use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::models::{BulkSpecialDaysRequest, SpecialDayInput, SpecialDayRequest};
use crate::state::AppState;
use crate::store::ReminderStore;

pub async fn list_special_days(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let days = state.store.list_special_days(true).await?;
    Ok(HttpResponse::Ok().json(days))
}

pub async fn create_special_day(
    data: web::Json<SpecialDayRequest>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let input = data.into_inner().into_input(false).map_err(AppError::BadRequest)?;
    let day = state.store.create_special_day(&input).await?;
    Ok(HttpResponse::Ok().json(day))
}

pub async fn get_special_day(path: web::Path<String>, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    match state.store.get_special_day(&id).await? {
        Some(day) => Ok(HttpResponse::Ok().json(day)),
        None => Err(AppError::NotFound("Special Day not found".to_string())),
    }
}

pub async fn update_special_day(
    path: web::Path<String>,
    data: web::Json<SpecialDayRequest>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let existing = state
        .store
        .get_special_day(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Special Day not found".to_string()))?;
    // an omitted isRecurring keeps the stored value
    let input = data
        .into_inner()
        .into_input(existing.is_recurring)
        .map_err(AppError::BadRequest)?;

    match state.store.update_special_day(&id, &input).await? {
        Some(day) => Ok(HttpResponse::Ok().json(day)),
        None => Err(AppError::NotFound("Special Day not found".to_string())),
    }
}

pub async fn delete_special_day(path: web::Path<String>, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !state.store.delete_special_day(&id).await? {
        return Err(AppError::NotFound("Special Day not found".to_string()));
    }
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// Imports a list of days, all scoped to the request's `unionId` or all global.
/// Imported days are yearly unless they say otherwise.
pub async fn bulk_create_special_days(
    data: web::Json<BulkSpecialDaysRequest>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let BulkSpecialDaysRequest { days, union_id } = data.into_inner();
    let days = match days {
        Some(days) if !days.is_empty() => days,
        _ => return Err(AppError::BadRequest("Valid 'days' array is required".to_string())),
    };

    let inputs = days
        .into_iter()
        .enumerate()
        .map(|(i, mut day)| {
            day.union_id = union_id.clone();
            day.into_input(true)
                .map_err(|e| AppError::BadRequest(format!("Row {}: {}", i + 1, e)))
        })
        .collect::<Result<Vec<SpecialDayInput>, AppError>>()?;

    let count = state.store.bulk_create_special_days(&inputs).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": count
    })))
}
