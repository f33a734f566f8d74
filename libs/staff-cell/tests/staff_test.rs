use assert_matches::assert_matches;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_models::records::Address;
use shared_utils::test_utils::{MockSupabaseRows, TestConfig};
use staff_cell::models::{AddStaffRequest, Shift, StaffCategory, StaffError, UpdateStaffRequest};
use staff_cell::services::staff::StaffService;

fn staff_service(server: &MockServer) -> StaffService {
    let config = TestConfig::with_supabase_url(&server.uri()).to_app_config();
    StaffService::new(&config)
}

fn hire_request(category: StaffCategory, email: &str) -> AddStaffRequest {
    AddStaffRequest {
        category,
        name: "Test Staffer".to_string(),
        email: email.to_string(),
        phone: "000000000".to_string(),
        address: Address::default(),
        department: "General".to_string(),
        shift: Shift::Morning,
        salary: 30000.0,
        doctor_id: None,
        joined_on: "2026-01-20".to_string(),
        image: None,
    }
}

#[tokio::test]
async fn hiring_assigns_a_category_scoped_sequential_ref() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/staff"))
        .and(query_param("email", "eq.nurse%40example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    // Three nurses on the roster -> the next one is ASTRA-NR-1003.
    Mock::given(method("GET"))
        .and(path("/rest/v1/staff"))
        .and(header("Prefer", "count=exact"))
        .and(query_param("category", "eq.nurse"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Range", "0-0/3")
                .set_body_json(json!([])),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/staff"))
        .and(body_partial_json(json!({
            "staff_ref": "ASTRA-NR-1003",
            "category": "nurse"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseRows::staff_row(&Uuid::new_v4().to_string(), "nurse", "ASTRA-NR-1003")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let service = staff_service(&server);
    let staff = service
        .add_staff(hire_request(StaffCategory::Nurse, "nurse@example.com"), "admin-token")
        .await
        .unwrap();

    assert_eq!(staff.staff_ref, "ASTRA-NR-1003");
    assert_eq!(staff.category, StaffCategory::Nurse);
}

#[tokio::test]
async fn each_category_counts_independently() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/staff"))
        .and(query_param("email", "eq.tech%40example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    // No lab technicians yet, regardless of how many nurses exist.
    Mock::given(method("GET"))
        .and(path("/rest/v1/staff"))
        .and(header("Prefer", "count=exact"))
        .and(query_param("category", "eq.lab_technician"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Range", "*/0")
                .set_body_json(json!([])),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/staff"))
        .and(body_partial_json(json!({ "staff_ref": "ASTRA-LT-1000" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseRows::staff_row(
                &Uuid::new_v4().to_string(),
                "lab_technician",
                "ASTRA-LT-1000",
            )
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let service = staff_service(&server);
    let staff = service
        .add_staff(
            hire_request(StaffCategory::LabTechnician, "tech@example.com"),
            "admin-token",
        )
        .await
        .unwrap();

    assert_eq!(staff.staff_ref, "ASTRA-LT-1000");
}

#[tokio::test]
async fn hiring_with_an_existing_email_is_refused() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/staff"))
        .and(query_param("email", "eq.taken%40example.com"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": Uuid::new_v4() }])),
        )
        .mount(&server)
        .await;

    let service = staff_service(&server);
    let result = service
        .add_staff(hire_request(StaffCategory::Support, "taken@example.com"), "admin-token")
        .await;

    assert_matches!(result, Err(StaffError::DuplicateEmail));
}

#[tokio::test]
async fn negative_salary_is_rejected_before_any_query() {
    let server = MockServer::start().await;

    let mut request = hire_request(StaffCategory::Pharmacist, "ph@example.com");
    request.salary = -1.0;

    let service = staff_service(&server);
    let result = service.add_staff(request, "admin-token").await;

    assert_matches!(result, Err(StaffError::Validation(_)));
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn roster_can_be_narrowed_to_a_category() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/staff"))
        .and(query_param("category", "eq.nurse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::staff_row(&Uuid::new_v4().to_string(), "nurse", "ASTRA-NR-1000"),
            MockSupabaseRows::staff_row(&Uuid::new_v4().to_string(), "nurse", "ASTRA-NR-1001"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let service = staff_service(&server);
    let staff = service
        .list_staff(Some(StaffCategory::Nurse), "admin-token")
        .await
        .unwrap();

    assert_eq!(staff.len(), 2);
    assert!(staff.iter().all(|s| s.category == StaffCategory::Nurse));
}

#[tokio::test]
async fn updating_patches_only_provided_fields() {
    let server = MockServer::start().await;
    let staff_id = Uuid::new_v4();

    let mut updated = MockSupabaseRows::staff_row(&staff_id.to_string(), "nurse", "ASTRA-NR-1000");
    updated["shift"] = json!("night");
    updated["salary"] = json!(35000.0);

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/staff"))
        .and(query_param("id", format!("eq.{}", staff_id)))
        .and(body_partial_json(json!({
            "shift": "night",
            "salary": 35000.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([updated])))
        .expect(1)
        .mount(&server)
        .await;

    let service = staff_service(&server);
    let staff = service
        .update_staff(
            staff_id,
            UpdateStaffRequest {
                name: None,
                phone: None,
                address: None,
                department: None,
                shift: Some(Shift::Night),
                salary: Some(35000.0),
                doctor_id: None,
            },
            "admin-token",
        )
        .await
        .unwrap();

    assert_eq!(staff.shift, Shift::Night);
    assert_eq!(staff.salary, 35000.0);
}

#[tokio::test]
async fn deleting_an_unknown_staff_member_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/staff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let service = staff_service(&server);
    let result = service.delete_staff(Uuid::new_v4(), "admin-token").await;

    assert_matches!(result, Err(StaffError::NotFound));
}
