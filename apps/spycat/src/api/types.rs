//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.
//!
//! Request bodies use `#[serde(default)]`: a missing field takes its zero
//! value. On the wire, `cat_id = 0` means "unassigned".

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use spycat_core::{
    AgencyError, Cat, CatId, Counts, ErrorKind, Mission, NewCat, NewMission, Target, TargetFields,
};

// =============================================================================
// HEALTH / STATUS
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Agency status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub backend: String,
    pub enforcement: String,
    pub cats: usize,
    pub missions: usize,
    pub incomplete_missions: usize,
    pub targets: usize,
    pub complete_targets: usize,
}

impl StatusResponse {
    #[must_use]
    pub fn new(backend: &str, enforcement: &str, counts: Counts) -> Self {
        Self {
            backend: backend.to_string(),
            enforcement: enforcement.to_string(),
            cats: counts.cats,
            missions: counts.missions,
            incomplete_missions: counts.incomplete_missions,
            targets: counts.targets,
            complete_targets: counts.complete_targets,
        }
    }
}

// =============================================================================
// CATS
// =============================================================================

/// Cat creation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatRequest {
    pub name: String,
    pub years_of_experience: u32,
    pub breed: String,
    pub salary: f64,
}

impl From<CatRequest> for NewCat {
    fn from(req: CatRequest) -> Self {
        Self {
            name: req.name,
            years_of_experience: req.years_of_experience,
            breed: req.breed,
            salary: req.salary,
        }
    }
}

/// A stored cat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatResponse {
    pub id: u64,
    pub name: String,
    pub years_of_experience: u32,
    pub breed: String,
    pub salary: f64,
}

impl From<Cat> for CatResponse {
    fn from(cat: Cat) -> Self {
        Self {
            id: cat.id.0,
            name: cat.name,
            years_of_experience: cat.years_of_experience,
            breed: cat.breed,
            salary: cat.salary,
        }
    }
}

/// Salary update request (`PUT /cats/{id}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryRequest {
    pub salary: f64,
}

// =============================================================================
// TARGETS
// =============================================================================

/// The writable target fields, used for requests and echoed responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetBody {
    pub name: String,
    pub country: String,
    pub notes: String,
    pub complete: bool,
}

impl From<TargetBody> for TargetFields {
    fn from(body: TargetBody) -> Self {
        Self {
            name: body.name,
            country: body.country,
            notes: body.notes,
            complete: body.complete,
        }
    }
}

impl From<&Target> for TargetBody {
    fn from(target: &Target) -> Self {
        Self {
            name: target.name.clone(),
            country: target.country.clone(),
            notes: target.notes.clone(),
            complete: target.complete,
        }
    }
}

/// A stored target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetResponse {
    pub id: u64,
    pub mission_id: u64,
    pub name: String,
    pub country: String,
    pub notes: String,
    pub complete: bool,
}

impl From<Target> for TargetResponse {
    fn from(target: Target) -> Self {
        Self {
            id: target.id.0,
            mission_id: target.mission.0,
            name: target.name,
            country: target.country,
            notes: target.notes,
            complete: target.complete,
        }
    }
}

/// Notes update request and response (`PUT /updatenotes/{id}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesBody {
    pub notes: String,
}

// =============================================================================
// MISSIONS
// =============================================================================

/// Mission creation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionRequest {
    pub cat_id: u64,
    pub complete: bool,
    pub targets: Vec<TargetBody>,
}

impl From<MissionRequest> for NewMission {
    fn from(req: MissionRequest) -> Self {
        Self {
            cat: CatId::from_wire(req.cat_id),
            complete: req.complete,
            targets: req.targets.into_iter().map(TargetFields::from).collect(),
        }
    }
}

/// Raw mission update request (`PUT /missions/{id}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionUpdateRequest {
    pub cat_id: u64,
    pub complete: bool,
}

/// A stored mission with its targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionResponse {
    pub id: u64,
    pub cat_id: u64,
    pub complete: bool,
    pub targets: Vec<TargetResponse>,
}

impl From<Mission> for MissionResponse {
    fn from(mission: Mission) -> Self {
        Self {
            id: mission.id.0,
            cat_id: CatId::to_wire(mission.cat),
            complete: mission.complete,
            targets: mission.targets.into_iter().map(Into::into).collect(),
        }
    }
}

/// Assignment request (`PUT /assigncat`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignRequest {
    pub cat_id: u64,
    pub mission_id: u64,
}

/// Assignment acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignResponse {
    pub message: String,
}

impl Default for AssignResponse {
    fn default() -> Self {
        Self {
            message: "Cat assigned to mission successfully".to_string(),
        }
    }
}

/// Completion acknowledgement (`PUT /complete/{id}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteResponse {
    pub result: String,
}

impl Default for CompleteResponse {
    fn default() -> Self {
        Self {
            result: "Mission completed".to_string(),
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// The single error body shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: ErrorKind,
}

/// An error ready to be sent: status plus body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: message.into(),
                kind,
            },
        }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorKind::Validation, message)
    }
}

/// HTTP status for each engine error.
///
/// The two conflict violations (busy cat, assigned mission) answer 400;
/// every other rule violation answers 403.
#[must_use]
pub fn status_for(err: &AgencyError) -> StatusCode {
    match err {
        AgencyError::Validation(_) | AgencyError::InvalidBreed(_) => StatusCode::BAD_REQUEST,
        AgencyError::NotFound(_) => StatusCode::NOT_FOUND,
        AgencyError::Violation(v) if v.is_conflict() => StatusCode::BAD_REQUEST,
        AgencyError::Violation(_) => StatusCode::FORBIDDEN,
        AgencyError::Storage(_) | AgencyError::Serialization(_) | AgencyError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<AgencyError> for ApiError {
    fn from(err: AgencyError) -> Self {
        let status = status_for(&err);
        if err.kind() == ErrorKind::Storage {
            tracing::error!(error = %err, "Storage failure");
            return Self::new(status, ErrorKind::Storage, "Internal storage error");
        }
        tracing::debug!(error = %err, status = status.as_u16(), "Request rejected");
        Self::new(status, err.kind(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Malformed request body");
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection, "Malformed path parameter");
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
