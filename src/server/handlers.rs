use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use store_object::{FindOptions, OrderBy, PageResult, Predicate, Record, RecordMeta};

use crate::models::Squad;
use crate::server::error::ApiError;
use crate::server::router::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub order_by: Option<String>,
}

fn squad_not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Squad {} not found", id))
}

fn squad_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn squad_body(body: Result<Json<Squad>, JsonRejection>) -> Result<Squad, ApiError> {
    body.map(|Json(squad)| squad)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

pub async fn check_status(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    match state.haus.health_check().await {
        Ok(()) => Ok(StatusCode::OK),
        Err(error) => {
            tracing::warn!(error = %error, "health check failed");
            Err(ApiError::Unavailable)
        }
    }
}

pub async fn list_squads(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<PageResult<Squad>>, ApiError> {
    let Query(params) = params.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let mut options = FindOptions::new().filter(Predicate::all());
    if let Some(page) = params.page {
        options = options.page(page);
    }
    if let Some(per_page) = params.per_page {
        options = options.per_page(per_page);
    }
    if let Some(order_by) = params.order_by.as_deref().filter(|raw| !raw.is_empty()) {
        let order_by = OrderBy::parse(order_by);
        if let OrderBy::Column(column, _) = &order_by {
            if !Squad::descriptor().has_field(column) {
                return Err(ApiError::BadRequest(format!("Cannot order by '{}'", column)));
            }
        }
        options = options.order_by(order_by);
    }

    let page = state.squads.find_per_page(options).await?;
    Ok(Json(page))
}

pub async fn get_squad(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Squad>, ApiError> {
    let id = squad_id(path)?;
    let squad = state
        .squads
        .find_by_id(id)
        .await?
        .ok_or_else(|| squad_not_found(id))?;
    Ok(Json(squad))
}

pub async fn create_squad(
    State(state): State<AppState>,
    body: Result<Json<Squad>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let mut squad = squad_body(body)?;
    squad.meta = RecordMeta::default();

    state.squads.save(&mut squad).await?;
    Ok((StatusCode::CREATED, Json(squad)))
}

pub async fn update_squad(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<Squad>, JsonRejection>,
) -> Result<Json<Squad>, ApiError> {
    let id = squad_id(path)?;
    let mut squad = squad_body(body)?;
    squad.meta = RecordMeta::with_id(id);

    if state.squads.update(&mut squad).await? == 0 {
        return Err(squad_not_found(id));
    }

    let updated = state
        .squads
        .find_by_id(id)
        .await?
        .ok_or_else(|| squad_not_found(id))?;
    Ok(Json(updated))
}

pub async fn delete_squad(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = squad_id(path)?;
    // Bypass the cache so a lookup miss cannot repopulate it behind the delete
    let mut squad = state
        .squads
        .find_one(FindOptions::new().filter(Predicate::by_id(id)))
        .await?
        .ok_or_else(|| squad_not_found(id))?;

    state.squads.delete(&mut squad).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
