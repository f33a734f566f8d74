use assert_matches::assert_matches;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::models::{AddDoctorRequest, DoctorError, UpdateDoctorProfileRequest};
use doctor_cell::services::doctor::DoctorService;
use shared_models::records::Address;
use shared_utils::test_utils::{MockSupabaseRows, TestConfig};

fn doctor_service(server: &MockServer) -> DoctorService {
    let config = TestConfig::with_supabase_url(&server.uri()).to_app_config();
    DoctorService::new(&config)
}

fn add_request(email: &str) -> AddDoctorRequest {
    AddDoctorRequest {
        name: "Dr. Test".to_string(),
        email: email.to_string(),
        password: "longenough".to_string(),
        specialty: "General physician".to_string(),
        degree: "MBBS".to_string(),
        experience: "4 Years".to_string(),
        about: "Experienced general physician".to_string(),
        fee: 50.0,
        address: Address::default(),
        image: None,
    }
}

#[tokio::test]
async fn adding_a_doctor_hashes_the_password_and_starts_available() {
    let server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("email", "eq.new%40example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctors"))
        .and(body_partial_json(json!({
            "email": "new@example.com",
            "available": true,
            "slots_booked": {}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseRows::doctor_row(&doctor_id.to_string(), "new@example.com", "Dr. Test")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let service = doctor_service(&server);
    let doctor = service
        .add_doctor(add_request("new@example.com"), "admin-token")
        .await
        .unwrap();

    assert!(doctor.available);
    assert!(doctor.slots_booked.is_empty());

    // The stored password must be an argon2 hash, never the plaintext.
    let insert = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.method.as_str() == "POST")
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&insert.body).unwrap();
    let stored = body["password"].as_str().unwrap();
    assert!(stored.starts_with("$argon2"));
}

#[tokio::test]
async fn adding_with_a_weak_password_is_rejected_before_any_query() {
    let server = MockServer::start().await;

    let mut request = add_request("new@example.com");
    request.password = "short".to_string();

    let service = doctor_service(&server);
    let result = service.add_doctor(request, "admin-token").await;

    assert_matches!(result, Err(DoctorError::Validation(_)));
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn adding_with_an_existing_email_is_refused() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("email", "eq.taken%40example.com"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": Uuid::new_v4() }])),
        )
        .mount(&server)
        .await;

    let service = doctor_service(&server);
    let result = service.add_doctor(add_request("taken@example.com"), "admin-token").await;

    assert_matches!(result, Err(DoctorError::DuplicateEmail));
}

#[tokio::test]
async fn changing_availability_toggles_the_current_flag() {
    let server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    // Currently available, so the toggle must PATCH available=false.
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::doctor_row(&doctor_id.to_string(), "doctor@example.com", "Dr. Test")
        ])))
        .mount(&server)
        .await;

    let mut toggled =
        MockSupabaseRows::doctor_row(&doctor_id.to_string(), "doctor@example.com", "Dr. Test");
    toggled["available"] = json!(false);

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctors"))
        .and(body_partial_json(json!({ "available": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([toggled])))
        .expect(1)
        .mount(&server)
        .await;

    let service = doctor_service(&server);
    let available = service
        .change_availability(doctor_id, "admin-token")
        .await
        .unwrap();

    assert!(!available);
}

#[tokio::test]
async fn profile_update_patches_only_provided_fields() {
    let server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    let mut updated =
        MockSupabaseRows::doctor_row(&doctor_id.to_string(), "doctor@example.com", "Dr. Test");
    updated["fee"] = json!(75.0);

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .and(body_partial_json(json!({ "fee": 75.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([updated])))
        .expect(1)
        .mount(&server)
        .await;

    let service = doctor_service(&server);
    let doctor = service
        .update_profile(
            doctor_id,
            UpdateDoctorProfileRequest {
                fee: Some(75.0),
                address: None,
                about: None,
                available: None,
            },
            "doctor-token",
        )
        .await
        .unwrap();

    assert_eq!(doctor.fee, 75.0);
}

#[tokio::test]
async fn listing_never_exposes_passwords_or_slot_internals() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::doctor_row(&Uuid::new_v4().to_string(), "a@example.com", "Dr. A"),
            MockSupabaseRows::doctor_row_with_slots(&Uuid::new_v4().to_string(), "20_1_2026", &["10:00 am"]),
        ])))
        .mount(&server)
        .await;

    let service = doctor_service(&server);
    let doctors = service.list_doctors(None).await.unwrap();

    assert_eq!(doctors.len(), 2);

    // The select list must ask for neither the password column nor the
    // slot bookkeeping map.
    let request = &server.received_requests().await.unwrap()[0];
    let query = request.url.query().unwrap_or_default();
    assert!(!query.contains("password"));
    assert!(!query.contains("slots_booked"));

    // And the rows as handlers serialize them carry no reservation map,
    // even for a doctor that has reservations.
    for doctor in &doctors {
        let listed = doctor.snapshot();
        assert!(listed.get("slots_booked").is_none());
        assert!(listed.get("password").is_none());
    }
}
