use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::models::UnionRequest;
use crate::state::AppState;
use crate::store::ReminderStore;

pub async fn list_unions(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let unions = state.store.list_unions().await?;
    Ok(HttpResponse::Ok().json(unions))
}

pub async fn create_union(
    data: web::Json<UnionRequest>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let input = data
        .into_inner()
        .into_input()
        .ok_or_else(|| AppError::BadRequest("Name is required".to_string()))?;

    let union = state.store.create_union(&input).await?;
    Ok(HttpResponse::Ok().json(union))
}

pub async fn get_union(path: web::Path<String>, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    match state.store.get_union(&id).await? {
        Some(union) => Ok(HttpResponse::Ok().json(union)),
        None => Err(AppError::NotFound("Union not found".to_string())),
    }
}

pub async fn update_union(
    path: web::Path<String>,
    data: web::Json<UnionRequest>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let input = data
        .into_inner()
        .into_input()
        .ok_or_else(|| AppError::BadRequest("Name is required".to_string()))?;

    match state.store.update_union(&id, &input).await? {
        Some(union) => Ok(HttpResponse::Ok().json(union)),
        None => Err(AppError::NotFound("Union not found".to_string())),
    }
}

pub async fn delete_union(path: web::Path<String>, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !state.store.delete_union(&id).await? {
        return Err(AppError::NotFound("Union not found".to_string()));
    }
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
