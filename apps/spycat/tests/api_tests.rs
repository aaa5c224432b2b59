//! Integration tests for the Spycat HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use spycat::api::{
    AppState, AssignResponse, CatResponse, CompleteResponse, ErrorResponse, HealthResponse,
    MissionResponse, NotesBody, StatusResponse, TargetBody, TargetResponse, create_router,
};
use spycat::breeds::BreedCatalog;
use spycat::config::ServerConfig;
use spycat_core::{BreedList, Enforcement, Engine, ErrorKind, StorageBackend};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn server_with(backend: StorageBackend, enforcement: Enforcement) -> TestServer {
    let breeds: BreedList = ["Siamese", "Bengal", "Maine Coon"].into_iter().collect();
    let state = AppState::new(
        Engine::new(backend, enforcement),
        BreedCatalog::Fixed(breeds),
    );
    let config = ServerConfig {
        rate_limit: 0,
        ..ServerConfig::default()
    };
    TestServer::new(create_router(state, &config)).unwrap()
}

/// Create a test server with a fresh in-memory agency.
fn create_test_server() -> TestServer {
    server_with(StorageBackend::memory(), Enforcement::Compatible)
}

fn create_strict_server() -> TestServer {
    server_with(StorageBackend::memory(), Enforcement::Strict)
}

async fn create_cat(server: &TestServer, name: &str) -> u64 {
    let response = server
        .post("/cats")
        .json(&json!({
            "name": name,
            "years_of_experience": 3,
            "breed": "Siamese",
            "salary": 1000.0
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<CatResponse>().id
}

async fn create_mission(server: &TestServer, cat_id: u64, targets: usize) -> MissionResponse {
    let targets: Vec<Value> = (0..targets)
        .map(|i| json!({"name": format!("Target {i}"), "country": "FR", "notes": ""}))
        .collect();
    let response = server
        .post("/missions")
        .json(&json!({"cat_id": cat_id, "targets": targets}))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

async fn target_count(server: &TestServer) -> usize {
    server.get("/targets").await.json::<Vec<TargetResponse>>().len()
}

fn assert_error(response: &axum_test::TestResponse, status: StatusCode, kind: ErrorKind) {
    response.assert_status(status);
    let body: ErrorResponse = response.json();
    assert_eq!(body.kind, kind);
    assert!(!body.error.is_empty());
}

// =============================================================================
// HEALTH / STATUS / HELLO
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_hello_endpoint() {
    let server = create_test_server();
    let response = server.get("/hello").await;
    response.assert_status_ok();
    response.assert_text("Hello, World!");
}

#[tokio::test]
async fn test_status_counts() {
    let server = create_strict_server();
    let cat = create_cat(&server, "Tom").await;
    create_mission(&server, cat, 2).await;

    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.backend, "memory");
    assert_eq!(status.enforcement, "strict");
    assert_eq!(status.cats, 1);
    assert_eq!(status.missions, 1);
    assert_eq!(status.incomplete_missions, 1);
    assert_eq!(status.targets, 2);
    assert_eq!(status.complete_targets, 0);
}

// =============================================================================
// CAT ENDPOINTS
// =============================================================================

#[tokio::test]
async fn test_create_cat_with_recognized_breed() {
    let server = create_test_server();

    let response = server
        .post("/cats")
        .json(&json!({
            "name": "Tom",
            "years_of_experience": 4,
            "breed": "Bengal",
            "salary": 1500.5
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let cat: CatResponse = response.json();
    assert!(cat.id > 0);
    assert_eq!(cat.breed, "Bengal");
    assert_eq!(cat.salary, 1500.5);

    let listed: Vec<CatResponse> = server.get("/cats").await.json();
    assert_eq!(listed, vec![cat.clone()]);

    let fetched: CatResponse = server.get(&format!("/cats/{}", cat.id)).await.json();
    assert_eq!(fetched, cat);
}

#[tokio::test]
async fn test_create_cat_with_unknown_breed_is_rejected() {
    let server = create_test_server();

    let response = server
        .post("/cats")
        .json(&json!({"name": "Sparkle", "years_of_experience": 1, "breed": "Unicorn", "salary": 10.0}))
        .await;

    assert_error(&response, StatusCode::BAD_REQUEST, ErrorKind::Validation);
    assert_eq!(response.json::<ErrorResponse>().error, "Invalid breed");
    assert!(server.get("/cats").await.json::<Vec<CatResponse>>().is_empty());
}

#[tokio::test]
async fn test_breed_match_is_case_sensitive() {
    let server = create_test_server();
    let response = server
        .post("/cats")
        .json(&json!({"name": "Tom", "breed": "siamese", "salary": 1.0}))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, ErrorKind::Validation);
}

#[tokio::test]
async fn test_create_cat_invalid_payload() {
    let server = create_test_server();

    // Empty name
    let response = server
        .post("/cats")
        .json(&json!({"name": "", "breed": "Siamese", "salary": 1.0}))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, ErrorKind::Validation);

    // Negative salary
    let response = server
        .post("/cats")
        .json(&json!({"name": "Tom", "breed": "Siamese", "salary": -5.0}))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, ErrorKind::Validation);
}

#[tokio::test]
async fn test_update_salary() {
    let server = create_test_server();
    let cat = create_cat(&server, "Tom").await;

    let response = server
        .put(&format!("/cats/{cat}"))
        .json(&json!({"salary": 2500.0}))
        .await;

    response.assert_status_ok();
    let updated: CatResponse = response.json();
    assert_eq!(updated.id, cat);
    assert_eq!(updated.salary, 2500.0);
    assert_eq!(updated.name, "Tom");
}

#[tokio::test]
async fn test_update_salary_missing_cat() {
    let server = create_test_server();
    let response = server.put("/cats/42").json(&json!({"salary": 1.0})).await;
    assert_error(&response, StatusCode::NOT_FOUND, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_get_missing_cat() {
    let server = create_test_server();
    let response = server.get("/cats/7").await;
    assert_error(&response, StatusCode::NOT_FOUND, ErrorKind::NotFound);
}

// =============================================================================
// MISSION ENDPOINTS
// =============================================================================

#[tokio::test]
async fn test_unassigned_mission_assign_then_delete_rejected() {
    let server = create_test_server();
    let cat = create_cat(&server, "Tom").await;

    let mission = create_mission(&server, 0, 2).await;
    assert!(mission.id > 0);
    assert_eq!(mission.cat_id, 0);
    assert_eq!(mission.targets.len(), 2);
    assert!(mission.targets.iter().all(|t| t.mission_id == mission.id));

    let response = server
        .put("/assigncat")
        .json(&json!({"cat_id": cat, "mission_id": mission.id}))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<AssignResponse>().message,
        "Cat assigned to mission successfully"
    );

    let response = server.delete(&format!("/missions/{}", mission.id)).await;
    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        ErrorKind::InvariantViolation,
    );

    let fetched: MissionResponse = server.get(&format!("/missions/{}", mission.id)).await.json();
    assert_eq!(fetched.cat_id, cat);
}

#[tokio::test]
async fn test_delete_unassigned_mission_cascades() {
    let server = create_test_server();
    let mission = create_mission(&server, 0, 3).await;
    assert_eq!(target_count(&server).await, 3);

    let response = server.delete(&format!("/missions/{}", mission.id)).await;
    response.assert_status(StatusCode::NO_CONTENT);

    assert_eq!(target_count(&server).await, 0);
    let response = server.get(&format!("/missions/{}", mission.id)).await;
    assert_error(&response, StatusCode::NOT_FOUND, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_completed_assigned_mission_rejected() {
    let server = create_test_server();
    let cat = create_cat(&server, "Tom").await;
    let mission = create_mission(&server, cat, 0).await;

    server
        .put(&format!("/complete/{}", mission.id))
        .await
        .assert_status_ok();

    let response = server.delete(&format!("/missions/{}", mission.id)).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_missing_mission() {
    let server = create_test_server();
    let response = server.delete("/missions/99").await;
    assert_error(&response, StatusCode::NOT_FOUND, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_second_incomplete_mission_rejected_at_creation() {
    let server = create_test_server();
    let cat = create_cat(&server, "Tom").await;
    create_mission(&server, cat, 1).await;

    let response = server
        .post("/missions")
        .json(&json!({"cat_id": cat, "targets": [{"name": "X", "country": "DE"}]}))
        .await;
    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        ErrorKind::InvariantViolation,
    );
    assert_eq!(
        response.json::<ErrorResponse>().error,
        "Cat already has an incomplete mission"
    );

    // Nothing from the rejected mission was written.
    assert_eq!(target_count(&server).await, 1);
    let missions: Vec<MissionResponse> = server.get("/missions").await.json();
    assert_eq!(missions.len(), 1);
}

#[tokio::test]
async fn test_new_mission_allowed_after_completion() {
    let server = create_test_server();
    let cat = create_cat(&server, "Tom").await;
    let first = create_mission(&server, cat, 0).await;
    server
        .put(&format!("/complete/{}", first.id))
        .await
        .assert_status_ok();

    create_mission(&server, cat, 0).await;
}

#[tokio::test]
async fn test_create_mission_for_missing_cat() {
    let server = create_test_server();
    let response = server
        .post("/missions")
        .json(&json!({"cat_id": 12, "targets": []}))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_list_missions_includes_targets() {
    let server = create_test_server();
    create_mission(&server, 0, 2).await;
    create_mission(&server, 0, 1).await;

    let missions: Vec<MissionResponse> = server.get("/missions").await.json();
    assert_eq!(missions.len(), 2);
    assert_eq!(missions[0].targets.len(), 2);
    assert_eq!(missions[1].targets.len(), 1);
    assert_eq!(missions[0].targets[0].name, "Target 0");
    assert_eq!(missions[0].targets[1].name, "Target 1");
}

#[tokio::test]
async fn test_complete_mission_twice_is_forbidden() {
    let server = create_test_server();
    let mission = create_mission(&server, 0, 1).await;

    let response = server.put(&format!("/complete/{}", mission.id)).await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<CompleteResponse>().result,
        "Mission completed"
    );

    let response = server.put(&format!("/complete/{}", mission.id)).await;
    assert_error(&response, StatusCode::FORBIDDEN, ErrorKind::InvariantViolation);
}

#[tokio::test]
async fn test_complete_missing_mission() {
    let server = create_test_server();
    let response = server.put("/complete/5").await;
    assert_error(&response, StatusCode::NOT_FOUND, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_raw_update_overwrites_in_compatible_mode() {
    let server = create_test_server();
    let cat = create_cat(&server, "Tom").await;
    let mission = create_mission(&server, 0, 0).await;
    server
        .put(&format!("/complete/{}", mission.id))
        .await
        .assert_status_ok();

    // Reopen and assign through the raw path.
    let response = server
        .put(&format!("/missions/{}", mission.id))
        .json(&json!({"cat_id": cat, "complete": false}))
        .await;
    response.assert_status_ok();
    let updated: MissionResponse = response.json();
    assert_eq!(updated.cat_id, cat);
    assert!(!updated.complete);
}

#[tokio::test]
async fn test_raw_update_cannot_reopen_in_strict_mode() {
    let server = create_strict_server();
    let mission = create_mission(&server, 0, 0).await;
    server
        .put(&format!("/complete/{}", mission.id))
        .await
        .assert_status_ok();

    let response = server
        .put(&format!("/missions/{}", mission.id))
        .json(&json!({"cat_id": 0, "complete": false}))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, ErrorKind::InvariantViolation);
}

#[tokio::test]
async fn test_raw_update_missing_mission() {
    let server = create_test_server();
    let response = server
        .put("/missions/3")
        .json(&json!({"cat_id": 0, "complete": true}))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, ErrorKind::NotFound);
}

// =============================================================================
// ASSIGNMENT
// =============================================================================

#[tokio::test]
async fn test_reassignment_skips_incomplete_check_in_compatible_mode() {
    let server = create_test_server();
    let cat = create_cat(&server, "Tom").await;
    create_mission(&server, cat, 0).await;
    let second = create_mission(&server, 0, 0).await;

    let response = server
        .put("/assigncat")
        .json(&json!({"cat_id": cat, "mission_id": second.id}))
        .await;
    response.assert_status_ok();

    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.incomplete_missions, 2);
}

#[tokio::test]
async fn test_reassignment_checks_incomplete_in_strict_mode() {
    let server = create_strict_server();
    let cat = create_cat(&server, "Tom").await;
    create_mission(&server, cat, 0).await;
    let second = create_mission(&server, 0, 0).await;

    let response = server
        .put("/assigncat")
        .json(&json!({"cat_id": cat, "mission_id": second.id}))
        .await;
    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        ErrorKind::InvariantViolation,
    );
}

#[tokio::test]
async fn test_assign_to_completed_mission_is_forbidden() {
    let server = create_test_server();
    let cat = create_cat(&server, "Tom").await;
    let mission = create_mission(&server, 0, 0).await;
    server
        .put(&format!("/complete/{}", mission.id))
        .await
        .assert_status_ok();

    let response = server
        .put("/assigncat")
        .json(&json!({"cat_id": cat, "mission_id": mission.id}))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, ErrorKind::InvariantViolation);
}

#[tokio::test]
async fn test_assign_missing_entities() {
    let server = create_test_server();
    let mission = create_mission(&server, 0, 0).await;

    let response = server
        .put("/assigncat")
        .json(&json!({"cat_id": 77, "mission_id": mission.id}))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, ErrorKind::NotFound);

    let cat = create_cat(&server, "Tom").await;
    let response = server
        .put("/assigncat")
        .json(&json!({"cat_id": cat, "mission_id": 77}))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, ErrorKind::NotFound);
}

// =============================================================================
// TARGET ENDPOINTS
// =============================================================================

#[tokio::test]
async fn test_add_target_echoes_fields() {
    let server = create_test_server();
    let mission = create_mission(&server, 0, 0).await;

    let body = TargetBody {
        name: "Dr. Evil".to_string(),
        country: "BE".to_string(),
        notes: "Wears a monocle".to_string(),
        complete: false,
    };
    let response = server
        .post(&format!("/addtarget/{}", mission.id))
        .json(&body)
        .await;

    response.assert_status(StatusCode::CREATED);
    let echoed: TargetBody = response.json();
    assert_eq!(echoed, body);
    assert!(response.json::<Value>().get("id").is_none());

    let targets: Vec<TargetResponse> = server.get("/targets").await.json();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].mission_id, mission.id);
}

#[tokio::test]
async fn test_add_target_to_completed_mission_leaves_store_unchanged() {
    let server = create_test_server();
    let mission = create_mission(&server, 0, 1).await;
    server
        .put(&format!("/complete/{}", mission.id))
        .await
        .assert_status_ok();
    let before = target_count(&server).await;

    let response = server
        .post(&format!("/addtarget/{}", mission.id))
        .json(&json!({"name": "Late", "country": "IT"}))
        .await;

    assert_error(&response, StatusCode::FORBIDDEN, ErrorKind::InvariantViolation);
    assert_eq!(target_count(&server).await, before);
}

#[tokio::test]
async fn test_add_target_to_missing_mission() {
    let server = create_test_server();
    let response = server
        .post("/addtarget/8")
        .json(&json!({"name": "Nobody", "country": "US"}))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_update_target_then_frozen() {
    let server = create_test_server();
    let mission = create_mission(&server, 0, 1).await;
    let target = mission.targets[0].id;

    let response = server
        .put(&format!("/targets/{target}"))
        .json(&json!({"name": "Renamed", "country": "ES", "notes": "found", "complete": true}))
        .await;
    response.assert_status_ok();
    let echoed: TargetBody = response.json();
    assert_eq!(echoed.name, "Renamed");
    assert!(echoed.complete);

    // Every later mutation of the completed target is rejected.
    let response = server
        .put(&format!("/targets/{target}"))
        .json(&json!({"name": "Again", "country": "ES"}))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, ErrorKind::InvariantViolation);

    let response = server
        .put(&format!("/updatenotes/{target}"))
        .json(&json!({"notes": "more"}))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, ErrorKind::InvariantViolation);
    assert_eq!(
        response.json::<ErrorResponse>().error,
        "Cannot update notes for a completed target"
    );

    let response = server.delete(&format!("/targets/{target}")).await;
    assert_error(&response, StatusCode::FORBIDDEN, ErrorKind::InvariantViolation);
    assert_eq!(
        response.json::<ErrorResponse>().error,
        "Cannot delete a completed target"
    );

    assert_eq!(target_count(&server).await, 1);
}

#[tokio::test]
async fn test_update_notes() {
    let server = create_test_server();
    let mission = create_mission(&server, 0, 1).await;
    let target = mission.targets[0].id;

    let response = server
        .put(&format!("/updatenotes/{target}"))
        .json(&json!({"notes": "Spotted in Lyon"}))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<NotesBody>(),
        NotesBody {
            notes: "Spotted in Lyon".to_string()
        }
    );

    let targets: Vec<TargetResponse> = server.get("/targets").await.json();
    assert_eq!(targets[0].notes, "Spotted in Lyon");
    assert_eq!(targets[0].name, "Target 0");
}

#[tokio::test]
async fn test_update_notes_on_completed_mission_rejected() {
    let server = create_test_server();
    let mission = create_mission(&server, 0, 1).await;
    let target = mission.targets[0].id;
    server
        .put(&format!("/complete/{}", mission.id))
        .await
        .assert_status_ok();

    let response = server
        .put(&format!("/updatenotes/{target}"))
        .json(&json!({"notes": "too late"}))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, ErrorKind::InvariantViolation);

    let targets: Vec<TargetResponse> = server.get("/targets").await.json();
    assert!(!targets[0].complete);
    assert_eq!(targets[0].notes, "");
}

#[tokio::test]
async fn test_target_ops_on_completed_mission_rejected() {
    let server = create_test_server();
    let mission = create_mission(&server, 0, 1).await;
    let target = mission.targets[0].id;
    server
        .put(&format!("/complete/{}", mission.id))
        .await
        .assert_status_ok();

    let response = server
        .put(&format!("/targets/{target}"))
        .json(&json!({"name": "X", "country": "Y"}))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, ErrorKind::InvariantViolation);

    let response = server.delete(&format!("/targets/{target}")).await;
    assert_error(&response, StatusCode::FORBIDDEN, ErrorKind::InvariantViolation);
}

#[tokio::test]
async fn test_delete_target() {
    let server = create_test_server();
    let mission = create_mission(&server, 0, 2).await;

    let response = server
        .delete(&format!("/targets/{}", mission.targets[0].id))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert_eq!(target_count(&server).await, 1);

    let response = server
        .delete(&format!("/targets/{}", mission.targets[0].id))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_missing_target_is_not_found() {
    let server = create_test_server();

    let response = server
        .put("/targets/404")
        .json(&json!({"name": "X", "country": "Y"}))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, ErrorKind::NotFound);

    let response = server
        .put("/updatenotes/404")
        .json(&json!({"notes": "x"}))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, ErrorKind::NotFound);
}

// =============================================================================
// MALFORMED REQUESTS
// =============================================================================

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let server = create_test_server();

    let response = server
        .post("/missions")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;

    assert_error(&response, StatusCode::BAD_REQUEST, ErrorKind::Validation);
}

#[tokio::test]
async fn test_wrong_field_type_is_bad_request() {
    let server = create_test_server();
    let response = server
        .put("/assigncat")
        .json(&json!({"cat_id": "one", "mission_id": 1}))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, ErrorKind::Validation);
}

#[tokio::test]
async fn test_unparseable_path_id_is_bad_request() {
    let server = create_test_server();

    let response = server.get("/cats/abc").await;
    assert_error(&response, StatusCode::BAD_REQUEST, ErrorKind::Validation);

    let response = server.delete("/missions/-1").await;
    assert_error(&response, StatusCode::BAD_REQUEST, ErrorKind::Validation);
}

#[tokio::test]
async fn test_missing_fields_take_zero_values() {
    let server = create_test_server();

    // No cat_id and no targets: an unassigned, empty mission.
    let response = server.post("/missions").json(&json!({})).await;
    response.assert_status(StatusCode::CREATED);
    let mission: MissionResponse = response.json();
    assert_eq!(mission.cat_id, 0);
    assert!(!mission.complete);
    assert!(mission.targets.is_empty());
}

#[tokio::test]
async fn test_too_many_targets_rejected() {
    let server = create_test_server();
    let targets: Vec<Value> = (0..=spycat_core::primitives::MAX_TARGETS_PER_MISSION)
        .map(|i| json!({"name": format!("T{i}"), "country": "NL"}))
        .collect();

    let response = server
        .post("/missions")
        .json(&json!({"cat_id": 0, "targets": targets}))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, ErrorKind::Validation);
    assert_eq!(target_count(&server).await, 0);
}

// =============================================================================
// PERSISTENT BACKEND
// =============================================================================

#[tokio::test]
async fn test_redb_backend_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agency.db");

    let mission_id = {
        let server = server_with(StorageBackend::redb(&path).unwrap(), Enforcement::Compatible);
        let cat = create_cat(&server, "Tom").await;
        let mission = create_mission(&server, cat, 2).await;
        server
            .put(&format!("/updatenotes/{}", mission.targets[1].id))
            .json(&json!({"notes": "persisted"}))
            .await
            .assert_status_ok();
        mission.id
    };

    let server = server_with(StorageBackend::redb(&path).unwrap(), Enforcement::Compatible);
    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.backend, "redb");
    assert_eq!(status.cats, 1);
    assert_eq!(status.targets, 2);

    let mission: MissionResponse = server.get(&format!("/missions/{mission_id}")).await.json();
    assert_eq!(mission.targets[1].notes, "persisted");
}
