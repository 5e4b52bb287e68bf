//! Patient endpoints.
//!
//! - `GET /api/patients?q=`: list, optionally filtered by name or phone
//! - `POST /api/patients`: register a patient
//! - `GET /api/patients/:id`: patient with visits
//! - `DELETE /api/patients/:id`: remove a patient and their visits
//! - `GET /api/export/patients?format=`: downloadable directory

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use clinic_core::{ExportFormat, NewPatient, Patient, PatientWithVisits};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::AppState;

#[derive(Deserialize)]
pub struct PatientListQuery {
    pub q: Option<String>,
}

/// `GET /api/patients`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PatientListQuery>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    let patients = state
        .run(move |m| m.list_patients(query.q.as_deref()))
        .await?;
    Ok(Json(patients))
}

/// `POST /api/patients`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewPatient>, JsonRejection>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let Json(input) = payload?;
    let patient = state.run(move |m| m.create_patient(input)).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// `GET /api/patients/:id`
pub async fn detail(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Json<PatientWithVisits>, ApiError> {
    let details = state
        .run(move |m| m.get_patient_with_visits(&patient_id))
        .await?;
    Ok(Json(details))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDeleted {
    pub message: String,
    pub visits_deleted: usize,
}

/// `DELETE /api/patients/:id`
pub async fn remove(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Json<PatientDeleted>, ApiError> {
    let visits_deleted = state
        .run(move |m| m.delete_patient(&patient_id))
        .await?;
    Ok(Json(PatientDeleted {
        message: "Patient and associated visits deleted successfully".to_string(),
        visits_deleted,
    }))
}

#[derive(Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// `GET /api/export/patients`
pub async fn export(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let format: ExportFormat = query
        .format
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(ApiError::BadRequest)?;

    let directory = state.run(|m| m.export_directory()).await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        directory.file_name(format)
    );
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(format.content_type())),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        directory.to_format(format),
    )
        .into_response())
}
