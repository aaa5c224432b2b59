//! # API Endpoint Handlers
//!
//! Each mutating handler decodes its input, takes the engine write lock,
//! and runs one engine operation. The lock is held for the whole
//! read-decide-write sequence and never across a network call.

use super::{
    AppState,
    types::{
        ApiError, AssignRequest, AssignResponse, CatRequest, CatResponse, CompleteResponse,
        HealthResponse, MissionRequest, MissionResponse, MissionUpdateRequest, NotesBody,
        SalaryRequest, StatusResponse, TargetBody, TargetResponse,
    },
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use spycat_core::{CatId, MissionId, NewCat, TargetId, VerifiedCat};

type Body<T> = Result<Json<T>, JsonRejection>;
type Id = Result<Path<u64>, PathRejection>;
type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// HEALTH / STATUS
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

pub async fn hello_handler() -> &'static str {
    "Hello, World!"
}

/// Entity counts plus the active backend and enforcement mode.
pub async fn status_handler(State(state): State<AppState>) -> ApiResult<Json<StatusResponse>> {
    let engine = state.engine.read().await;
    let counts = engine.counts()?;
    Ok(Json(StatusResponse::new(
        engine.store().name(),
        engine.enforcement().as_str(),
        counts,
    )))
}

// =============================================================================
// CAT HANDLERS
// =============================================================================

pub async fn list_cats_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<CatResponse>>> {
    let engine = state.engine.read().await;
    let cats = engine.cats()?;
    Ok(Json(cats.into_iter().map(Into::into).collect()))
}

pub async fn get_cat_handler(
    State(state): State<AppState>,
    id: Id,
) -> ApiResult<Json<CatResponse>> {
    let Path(id) = id?;
    let engine = state.engine.read().await;
    Ok(Json(engine.cat(CatId(id))?.into()))
}

/// Create a cat after checking its breed.
///
/// The breed list is resolved before the write lock is taken.
pub async fn create_cat_handler(
    State(state): State<AppState>,
    body: Body<CatRequest>,
) -> ApiResult<(StatusCode, Json<CatResponse>)> {
    let Json(request) = body?;
    let draft = NewCat::from(request);
    draft.validate()?;

    let breeds = state.breeds.resolve().await;
    let verified = VerifiedCat::verify(draft, &breeds)?;

    let mut engine = state.engine.write().await;
    let cat = engine.create_cat(verified)?;
    tracing::info!(cat = cat.id.0, breed = %cat.breed, "Cat created");
    Ok((StatusCode::CREATED, Json(cat.into())))
}

pub async fn update_salary_handler(
    State(state): State<AppState>,
    id: Id,
    body: Body<SalaryRequest>,
) -> ApiResult<Json<CatResponse>> {
    let Path(id) = id?;
    let Json(request) = body?;
    let mut engine = state.engine.write().await;
    let cat = engine.update_salary(CatId(id), request.salary)?;
    Ok(Json(cat.into()))
}

// =============================================================================
// MISSION HANDLERS
// =============================================================================

pub async fn list_missions_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<MissionResponse>>> {
    let engine = state.engine.read().await;
    let missions = engine.missions()?;
    Ok(Json(missions.into_iter().map(Into::into).collect()))
}

pub async fn get_mission_handler(
    State(state): State<AppState>,
    id: Id,
) -> ApiResult<Json<MissionResponse>> {
    let Path(id) = id?;
    let engine = state.engine.read().await;
    Ok(Json(engine.mission(MissionId(id))?.into()))
}

/// Create a mission and its targets atomically.
pub async fn create_mission_handler(
    State(state): State<AppState>,
    body: Body<MissionRequest>,
) -> ApiResult<(StatusCode, Json<MissionResponse>)> {
    let Json(request) = body?;
    let mut engine = state.engine.write().await;
    let mission = engine.create_mission(request.into())?;
    tracing::info!(
        mission = mission.id.0,
        targets = mission.targets.len(),
        "Mission created"
    );
    Ok((StatusCode::CREATED, Json(mission.into())))
}

/// Raw overwrite of `cat_id` and `complete`.
pub async fn update_mission_handler(
    State(state): State<AppState>,
    id: Id,
    body: Body<MissionUpdateRequest>,
) -> ApiResult<Json<MissionResponse>> {
    let Path(id) = id?;
    let Json(request) = body?;
    let id = MissionId(id);

    let mut engine = state.engine.write().await;
    engine.update_mission(id, CatId::from_wire(request.cat_id), request.complete)?;
    Ok(Json(engine.mission(id)?.into()))
}

pub async fn delete_mission_handler(
    State(state): State<AppState>,
    id: Id,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    let mut engine = state.engine.write().await;
    engine.delete_mission(MissionId(id))?;
    tracing::info!(mission = id, "Mission deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn complete_mission_handler(
    State(state): State<AppState>,
    id: Id,
) -> ApiResult<Json<CompleteResponse>> {
    let Path(id) = id?;
    let mut engine = state.engine.write().await;
    engine.complete_mission(MissionId(id))?;
    tracing::info!(mission = id, "Mission completed");
    Ok(Json(CompleteResponse::default()))
}

pub async fn assign_cat_handler(
    State(state): State<AppState>,
    body: Body<AssignRequest>,
) -> ApiResult<Json<AssignResponse>> {
    let Json(request) = body?;
    let mut engine = state.engine.write().await;
    engine.assign_cat(CatId(request.cat_id), MissionId(request.mission_id))?;
    tracing::info!(
        cat = request.cat_id,
        mission = request.mission_id,
        "Cat assigned"
    );
    Ok(Json(AssignResponse::default()))
}

// =============================================================================
// TARGET HANDLERS
// =============================================================================

pub async fn list_targets_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<TargetResponse>>> {
    let engine = state.engine.read().await;
    let targets = engine.targets()?;
    Ok(Json(targets.into_iter().map(Into::into).collect()))
}

/// Add a target to a mission. Echoes the submitted fields.
pub async fn add_target_handler(
    State(state): State<AppState>,
    id: Id,
    body: Body<TargetBody>,
) -> ApiResult<(StatusCode, Json<TargetBody>)> {
    let Path(id) = id?;
    let Json(request) = body?;
    let mut engine = state.engine.write().await;
    let target = engine.create_target(MissionId(id), request.into())?;
    Ok((StatusCode::CREATED, Json(TargetBody::from(&target))))
}

/// Full overwrite of a target. Echoes the submitted fields.
pub async fn update_target_handler(
    State(state): State<AppState>,
    id: Id,
    body: Body<TargetBody>,
) -> ApiResult<Json<TargetBody>> {
    let Path(id) = id?;
    let Json(request) = body?;
    let mut engine = state.engine.write().await;
    let target = engine.update_target(TargetId(id), request.into())?;
    Ok(Json(TargetBody::from(&target)))
}

pub async fn update_notes_handler(
    State(state): State<AppState>,
    id: Id,
    body: Body<NotesBody>,
) -> ApiResult<Json<NotesBody>> {
    let Path(id) = id?;
    let Json(request) = body?;
    let mut engine = state.engine.write().await;
    let target = engine.update_notes(TargetId(id), request.notes)?;
    Ok(Json(NotesBody {
        notes: target.notes,
    }))
}

pub async fn delete_target_handler(
    State(state): State<AppState>,
    id: Id,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    let mut engine = state.engine.write().await;
    engine.delete_target(TargetId(id))?;
    Ok(StatusCode::NO_CONTENT)
}
