//! Handlers for the `/campuses` resource.

use autoriza_core::error::CoreError;
use autoriza_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use autoriza_core::types::DbId;
use autoriza_core::validation::validate_name;
use autoriza_db::models::campus::{Campus, CreateCampus, UpdateCampus};
use autoriza_db::repositories::CampusRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/campuses
///
/// Public so the registration form can offer a campus list.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Campus>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let campuses = CampusRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: campuses }))
}

/// POST /api/v1/campuses (admin)
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateCampus>,
) -> AppResult<(StatusCode, Json<DataResponse<Campus>>)> {
    let input = CreateCampus {
        name: validate_name("Campus name", &input.name)?,
    };
    let campus = CampusRepo::create(&state.pool, &input).await?;
    tracing::info!(admin_id = admin.user_id, campus_id = campus.id, "Campus created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: campus })))
}

/// PUT /api/v1/campuses/{id} (admin)
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCampus>,
) -> AppResult<Json<DataResponse<Campus>>> {
    let input = UpdateCampus {
        name: validate_name("Campus name", &input.name)?,
    };
    let campus = CampusRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::not_found("Campus", id))?;
    Ok(Json(DataResponse { data: campus }))
}

/// DELETE /api/v1/campuses/{id} (admin)
///
/// Refused while any user or event still belongs to the campus.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    CampusRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::not_found("Campus", id))?;

    if CampusRepo::is_referenced(&state.pool, id).await? {
        return Err(CoreError::Conflict(
            "Campus cannot be deleted while users or events belong to it".into(),
        )
        .into());
    }

    CampusRepo::delete(&state.pool, id).await?;
    tracing::info!(admin_id = admin.user_id, campus_id = id, "Campus deleted");
    Ok(StatusCode::NO_CONTENT)
}
