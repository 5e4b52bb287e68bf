//! Visit endpoints.
//!
//! - `POST /api/patients/:id/visits`: record a visit
//! - `DELETE /api/patients/:id/visits/:visit_id`: remove one visit

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use clinic_core::{NewVisit, Visit};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::AppState;

/// `POST /api/patients/:id/visits`
pub async fn create(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    payload: Result<Json<NewVisit>, JsonRejection>,
) -> Result<(StatusCode, Json<Visit>), ApiError> {
    let Json(input) = payload?;
    let visit = state
        .run(move |m| m.add_visit(&patient_id, input))
        .await?;
    Ok((StatusCode::CREATED, Json(visit)))
}

#[derive(Serialize)]
pub struct VisitDeleted {
    pub message: String,
}

/// `DELETE /api/patients/:id/visits/:visit_id`
pub async fn remove(
    State(state): State<AppState>,
    Path((patient_id, visit_id)): Path<(String, String)>,
) -> Result<Json<VisitDeleted>, ApiError> {
    state
        .run(move |m| m.delete_visit(&patient_id, &visit_id))
        .await?;
    Ok(Json(VisitDeleted {
        message: "Visit deleted successfully".to_string(),
    }))
}
