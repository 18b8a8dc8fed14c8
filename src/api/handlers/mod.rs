use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use super::AppState;
use crate::models::*;
use crate::outline;
use crate::report::{self, RenderError};
use crate::sheet::{Sheet, SheetError};

type ApiResult<T> = Result<T, (StatusCode, String)>;

// ============================================================
// Error Handling
// ============================================================

/// Only reached when the session is strict; lenient sessions absorb stale
/// indices before they get here.
fn sheet_error(e: SheetError) -> (StatusCode, String) {
    tracing::warn!("Rejected edit: {}", e);
    (StatusCode::NOT_FOUND, e.to_string())
}

/// A failed export is reported to the client; the session is untouched.
fn render_error(e: RenderError) -> (StatusCode, String) {
    match e {
        RenderError::UnsupportedCharacter { .. } => {
            tracing::warn!("Export rejected: {}", e);
            (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
        other => {
            tracing::error!("Export failed: {}", other);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Report could not be generated".to_string(),
            )
        }
    }
}

/// Run one snapshot transition against the session.
fn apply<F>(state: &AppState, op: F) -> ApiResult<Json<Sheet>>
where
    F: FnOnce(&Sheet) -> Result<Sheet, SheetError>,
{
    let mut session = state.session.lock().expect("session lock poisoned");
    session.apply(op).map(Json).map_err(sheet_error)
}

fn snapshot(state: &AppState) -> Sheet {
    state
        .session
        .lock()
        .expect("session lock poisoned")
        .snapshot()
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Sheet
// ============================================================

pub async fn get_sheet(State(state): State<AppState>) -> Json<Sheet> {
    Json(snapshot(&state))
}

pub async fn get_outline(State(state): State<AppState>) -> String {
    outline::render_outline(&snapshot(&state))
}

// ============================================================
// Categories
// ============================================================

pub async fn add_category(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<Sheet>)> {
    apply(&state, |s| Ok(s.add_category())).map(|sheet| (StatusCode::CREATED, sheet))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(cat): Path<usize>,
) -> ApiResult<Json<Sheet>> {
    apply(&state, |s| s.delete_category(cat))
}

pub async fn update_category_title(
    State(state): State<AppState>,
    Path(cat): Path<usize>,
    Json(input): Json<UpdateTitleInput>,
) -> ApiResult<Json<Sheet>> {
    apply(&state, |s| s.update_category_title(cat, input.title))
}

// ============================================================
// Rows
// ============================================================

pub async fn add_row(
    State(state): State<AppState>,
    Path(cat): Path<usize>,
) -> ApiResult<(StatusCode, Json<Sheet>)> {
    apply(&state, |s| s.add_row(cat)).map(|sheet| (StatusCode::CREATED, sheet))
}

pub async fn delete_row(
    State(state): State<AppState>,
    Path((cat, row)): Path<(usize, usize)>,
) -> ApiResult<Json<Sheet>> {
    apply(&state, |s| s.delete_row(cat, row))
}

pub async fn update_row_field(
    State(state): State<AppState>,
    Path((cat, row)): Path<(usize, usize)>,
    Json(field): Json<RowField>,
) -> ApiResult<Json<Sheet>> {
    apply(&state, |s| s.update_row_field(cat, row, field))
}

// ============================================================
// Actors
// ============================================================

pub async fn add_actor(
    State(state): State<AppState>,
    Path((cat, row)): Path<(usize, usize)>,
) -> ApiResult<(StatusCode, Json<Sheet>)> {
    apply(&state, |s| s.add_actor(cat, row)).map(|sheet| (StatusCode::CREATED, sheet))
}

pub async fn update_actor_field(
    State(state): State<AppState>,
    Path((cat, row, actor)): Path<(usize, usize, usize)>,
    Json(field): Json<ActorField>,
) -> ApiResult<Json<Sheet>> {
    apply(&state, |s| s.update_actor_field(cat, row, actor, field))
}

pub async fn delete_actor(
    State(state): State<AppState>,
    Path((cat, row, actor)): Path<(usize, usize, usize)>,
) -> ApiResult<Json<Sheet>> {
    apply(&state, |s| s.delete_actor(cat, row, actor))
}

// ============================================================
// Export
// ============================================================

pub async fn export(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let sheet = snapshot(&state);
    let bytes = report::export_document(&sheet, &state.export).map_err(render_error)?;

    let disposition = format!("attachment; filename=\"{}\"", state.export.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
