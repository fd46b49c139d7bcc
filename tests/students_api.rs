mod test_support;

use axum::http::StatusCode;
use serde_json::json;
use test_support::{app, count, delete, get, patch, post, post_created, seed_class, seed_student};

#[tokio::test]
async fn create_student_nests_its_class() {
    let app = app();
    let class_id = seed_class(&app, "Grade 1").await;
    let created = post_created(&app, "/student", json!({ "name": "Alice", "in_class": class_id })).await;
    assert_eq!(
        created,
        json!({ "id": 1, "name": "Alice", "in_class": { "id": 1, "name": "Grade 1" } })
    );

    let (_, class) = get(&app, "/class/1").await;
    assert_eq!(class["student"], json!([{ "id": 1, "name": "Alice" }]));
}

#[tokio::test]
async fn unknown_class_is_not_found_and_persists_nothing() {
    let app = app();
    let (status, problem) = post(&app, "/student", json!({ "name": "Ghost", "in_class": 42 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(problem["detail"], "class 42 not found");
    assert_eq!(count(&app, "/student").await, 0);
}

#[tokio::test]
async fn missing_fields_are_reported_together() {
    let app = app();
    let (status, problem) = post(&app, "/student", json!({ "name": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let pointers: Vec<_> = problem["invalid_params"]
        .as_array()
        .expect("params")
        .iter()
        .map(|p| p["pointer"].as_str().expect("pointer").to_string())
        .collect();
    assert_eq!(pointers, vec!["/name", "/in_class"]);
}

#[tokio::test]
async fn patch_name_only_keeps_class() {
    let app = app();
    let class_id = seed_class(&app, "Grade 1").await;
    let student = seed_student(&app, "Alice", class_id).await;

    let (status, updated) = patch(&app, &format!("/student/{student}"), json!({ "name": "Alicia" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Alicia");
    assert_eq!(updated["in_class"], json!({ "id": class_id, "name": "Grade 1" }));
}

#[tokio::test]
async fn patch_can_reassign_class() {
    let app = app();
    let first = seed_class(&app, "Grade 1").await;
    let second = seed_class(&app, "Grade 2").await;
    let student = seed_student(&app, "Alice", first).await;

    let (status, moved) = patch(&app, &format!("/student/{student}"), json!({ "in_class": second })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["name"], "Alice");
    assert_eq!(moved["in_class"]["id"], second);

    let (_, old) = get(&app, &format!("/class/{first}")).await;
    assert_eq!(old["student"], json!([]));

    let (status, _) = patch(&app, &format!("/student/{student}"), json!({ "in_class": 99 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, unchanged) = get(&app, &format!("/student/{student}")).await;
    assert_eq!(unchanged["in_class"]["id"], second);
}

#[tokio::test]
async fn deleting_student_removes_attendance_only_for_them() {
    let app = app();
    let class_id = seed_class(&app, "Grade 1").await;
    let alice = seed_student(&app, "Alice", class_id).await;
    let bob = seed_student(&app, "Bob", class_id).await;
    for student in [alice, bob] {
        post_created(&app, "/attendance", json!({ "student": student, "date": "04/09/2023", "present": true })).await;
    }

    let (status, _) = delete(&app, &format!("/student/{alice}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = delete(&app, &format!("/student/{alice}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, rows) = get(&app, "/attendance").await;
    let rows = rows.as_array().expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["student"]["id"], bob);

    let (_, class) = get(&app, &format!("/class/{class_id}")).await;
    assert_eq!(class["student"], json!([{ "id": bob, "name": "Bob" }]));
}
